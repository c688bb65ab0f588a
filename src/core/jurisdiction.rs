use super::error::TaxError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Jurisdiction used when the permissive lookup is given an unknown code
pub const DEFAULT_JURISDICTION: &str = "ON";

/// Sales tax composition of a province or territory, as rate fractions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JurisdictionRate {
    pub gst: Decimal,
    pub pst: Decimal,
    pub hst: Decimal,
    /// Quebec Sales Tax. Treated as a provincial tax that is recoverable like GST.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qst: Option<Decimal>,
    /// Local name of the provincial tax (PST, RST, QST)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provincial_tax_name: Option<&'static str>,
}

impl JurisdictionRate {
    const fn gst_only() -> Self {
        JurisdictionRate {
            gst: dec!(0.05),
            pst: Decimal::ZERO,
            hst: Decimal::ZERO,
            qst: None,
            provincial_tax_name: None,
        }
    }

    const fn gst_pst(pst: Decimal, name: &'static str) -> Self {
        JurisdictionRate {
            gst: dec!(0.05),
            pst,
            hst: Decimal::ZERO,
            qst: None,
            provincial_tax_name: Some(name),
        }
    }

    const fn hst(hst: Decimal) -> Self {
        JurisdictionRate {
            gst: Decimal::ZERO,
            pst: Decimal::ZERO,
            hst,
            qst: None,
            provincial_tax_name: None,
        }
    }

    /// Provincial rate applied on top of GST, including QST where present
    pub fn provincial(&self) -> Decimal {
        self.pst + self.qst.unwrap_or(Decimal::ZERO)
    }

    /// Combined rate of every populated component
    pub fn total_rate(&self) -> Decimal {
        self.gst + self.hst + self.provincial()
    }

    pub fn has_hst(&self) -> bool {
        self.hst > Decimal::ZERO
    }

    pub fn has_qst(&self) -> bool {
        self.qst.is_some_and(|q| q > Decimal::ZERO)
    }
}

/// A row of the rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jurisdiction {
    pub code: &'static str,
    pub name: &'static str,
    pub rate: JurisdictionRate,
}

/// Display row for jurisdiction enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JurisdictionSummary {
    pub code: &'static str,
    pub name: &'static str,
    pub total_rate: Decimal,
}

static RATE_TABLE: [Jurisdiction; 13] = [
    Jurisdiction {
        code: "AB",
        name: "Alberta",
        rate: JurisdictionRate::gst_only(),
    },
    Jurisdiction {
        code: "BC",
        name: "British Columbia",
        rate: JurisdictionRate::gst_pst(dec!(0.07), "PST"),
    },
    Jurisdiction {
        code: "MB",
        name: "Manitoba",
        rate: JurisdictionRate::gst_pst(dec!(0.07), "RST"),
    },
    Jurisdiction {
        code: "NB",
        name: "New Brunswick",
        rate: JurisdictionRate::hst(dec!(0.15)),
    },
    Jurisdiction {
        code: "NL",
        name: "Newfoundland and Labrador",
        rate: JurisdictionRate::hst(dec!(0.15)),
    },
    Jurisdiction {
        code: "NS",
        name: "Nova Scotia",
        rate: JurisdictionRate::hst(dec!(0.15)),
    },
    Jurisdiction {
        code: "NT",
        name: "Northwest Territories",
        rate: JurisdictionRate::gst_only(),
    },
    Jurisdiction {
        code: "NU",
        name: "Nunavut",
        rate: JurisdictionRate::gst_only(),
    },
    Jurisdiction {
        code: "ON",
        name: "Ontario",
        rate: JurisdictionRate::hst(dec!(0.13)),
    },
    Jurisdiction {
        code: "PE",
        name: "Prince Edward Island",
        rate: JurisdictionRate::hst(dec!(0.15)),
    },
    Jurisdiction {
        code: "QC",
        name: "Quebec",
        rate: JurisdictionRate {
            gst: dec!(0.05),
            pst: Decimal::ZERO,
            hst: Decimal::ZERO,
            qst: Some(dec!(0.09975)),
            provincial_tax_name: Some("QST"),
        },
    },
    Jurisdiction {
        code: "SK",
        name: "Saskatchewan",
        rate: JurisdictionRate::gst_pst(dec!(0.06), "PST"),
    },
    Jurisdiction {
        code: "YT",
        name: "Yukon",
        rate: JurisdictionRate::gst_only(),
    },
];

/// Normalise a user-supplied code for lookup
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn find(code: &str) -> Option<&'static Jurisdiction> {
    let code = normalize_code(code);
    RATE_TABLE.iter().find(|j| j.code == code)
}

/// Strict lookup: unknown codes are an error
pub fn lookup(code: &str) -> Result<&'static Jurisdiction, TaxError> {
    find(code).ok_or_else(|| TaxError::InvalidJurisdiction(code.to_string()))
}

/// Permissive lookup: unknown codes resolve to [`DEFAULT_JURISDICTION`]
pub fn resolve(code: &str) -> &'static Jurisdiction {
    match find(code) {
        Some(jurisdiction) => jurisdiction,
        None => {
            log::warn!(
                "Unknown jurisdiction '{}', falling back to {}",
                code,
                DEFAULT_JURISDICTION
            );
            default_jurisdiction()
        }
    }
}

/// Permissive rate lookup
pub fn rate_of(code: &str) -> &'static JurisdictionRate {
    &resolve(code).rate
}

fn default_jurisdiction() -> &'static Jurisdiction {
    // The default code is one of the table rows.
    RATE_TABLE
        .iter()
        .find(|j| j.code == DEFAULT_JURISDICTION)
        .unwrap_or(&RATE_TABLE[0])
}

/// Every jurisdiction in table order (alphabetical by code)
pub fn all_jurisdictions() -> Vec<JurisdictionSummary> {
    RATE_TABLE
        .iter()
        .map(|j| JurisdictionSummary {
            code: j.code,
            name: j.name,
            total_rate: j.rate.total_rate(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_all_provinces_and_territories() {
        let codes: Vec<_> = all_jurisdictions().iter().map(|j| j.code).collect();
        assert_eq!(
            codes,
            vec!["AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT"]
        );
    }

    #[test]
    fn total_rates() {
        let total = |code: &str| {
            all_jurisdictions()
                .into_iter()
                .find(|j| j.code == code)
                .map(|j| j.total_rate)
                .unwrap()
        };
        assert_eq!(total("AB"), dec!(0.05));
        assert_eq!(total("BC"), dec!(0.12));
        assert_eq!(total("SK"), dec!(0.11));
        assert_eq!(total("ON"), dec!(0.13));
        assert_eq!(total("NS"), dec!(0.15));
        assert_eq!(total("QC"), dec!(0.14975));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("on").unwrap().code, "ON");
        assert_eq!(lookup("Bc").unwrap().code, "BC");
        assert_eq!(lookup(" qc ").unwrap().code, "QC");
    }

    #[test]
    fn strict_lookup_rejects_unknown_code() {
        assert_eq!(
            lookup("ZZ"),
            Err(TaxError::InvalidJurisdiction("ZZ".to_string()))
        );
    }

    #[test]
    fn permissive_lookup_falls_back_to_ontario() {
        assert_eq!(resolve("ZZ").code, "ON");
        assert_eq!(rate_of("ZZ"), rate_of("ON"));
        assert_eq!(rate_of(""), rate_of("ON"));
    }

    #[test]
    fn quebec_carries_qst() {
        let qc = rate_of("QC");
        assert!(qc.has_qst());
        assert!(!qc.has_hst());
        assert_eq!(qc.provincial(), dec!(0.09975));
        assert_eq!(qc.provincial_tax_name, Some("QST"));
    }

    #[test]
    fn hst_provinces_have_no_separate_gst() {
        for code in ["NB", "NL", "NS", "ON", "PE"] {
            let rate = rate_of(code);
            assert!(rate.has_hst(), "{code}");
            assert_eq!(rate.gst, Decimal::ZERO, "{code}");
            assert_eq!(rate.provincial(), Decimal::ZERO, "{code}");
        }
    }
}
