//! Configured tax engine: strict jurisdiction validation, input tax credits,
//! remittance netting and filing deadlines for one registrant.

use super::calculator::TaxBreakdown;
use super::clock::{Clock, SystemClock};
use super::error::TaxError;
use super::filing::{self, Deadline, FilingFrequency, FilingPeriod};
use super::jurisdiction::{self, Jurisdiction, JurisdictionRate};
use super::money::{check_amount, round2};
use super::transaction::{in_range, DateRange, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Description fragments that make an expense ineligible for input tax credits
pub const ITC_DENY_LIST: &[&str] = &[
    "meals",
    "entertainment",
    "personal",
    "gift",
    "club membership",
];

/// Largest difference between two tax amounts still treated as equal
pub const VALIDATION_TOLERANCE: Decimal = dec!(0.01);

/// Registrant settings, fixed for the life of an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EngineConfig {
    /// Province or territory the registrant files from
    pub home_jurisdiction: String,
    #[serde(default)]
    pub filing_frequency: FilingFrequency,
    /// Business number with RT program account (informational)
    #[serde(default)]
    pub gst_hst_number: Option<String>,
    /// Revenu Québec QST registration (informational)
    #[serde(default)]
    pub qst_number: Option<String>,
    /// Provincial sales tax registration (informational)
    #[serde(default)]
    pub pst_number: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            home_jurisdiction: jurisdiction::DEFAULT_JURISDICTION.to_string(),
            filing_frequency: FilingFrequency::default(),
            gst_hst_number: None,
            qst_number: None,
            pst_number: None,
        }
    }
}

/// Input tax credits claimable on a set of expenses
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ItcResult {
    pub eligible_amount: Decimal,
    pub gst_itc: Decimal,
    pub pst_itc: Decimal,
    pub hst_itc: Decimal,
    pub total_itc: Decimal,
    pub ineligible_amount: Decimal,
}

/// Net tax owed for a filing period. Negative totals are refunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemittanceResult {
    pub period: FilingPeriod,
    pub gst_hst_collected: Decimal,
    pub gst_hst_paid: Decimal,
    pub net_gst_hst: Decimal,
    pub pst_collected: Decimal,
    pub pst_paid: Decimal,
    pub net_pst: Decimal,
    pub total_remittance: Decimal,
    pub due_date: NaiveDate,
    pub is_overdue: bool,
}

/// Outcome of reconciling a supplied breakdown against the engine's own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Eligible unless the description names a personal or entertainment expense
pub fn is_eligible_for_itc(expense: &Transaction) -> bool {
    match &expense.description {
        Some(description) => {
            let description = description.to_lowercase();
            !ITC_DENY_LIST.iter().any(|term| description.contains(term))
        }
        None => true,
    }
}

/// QST is recoverable like GST; other provincial sales taxes are not
pub fn is_pst_recoverable(_expense: &Transaction, rate: &JurisdictionRate) -> bool {
    rate.has_qst()
}

pub struct TaxEngine<C: Clock = SystemClock> {
    config: EngineConfig,
    home: &'static Jurisdiction,
    clock: C,
}

impl TaxEngine<SystemClock> {
    #[allow(dead_code)]
    pub fn new(config: EngineConfig) -> Result<Self, TaxError> {
        TaxEngine::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TaxEngine<C> {
    /// Build an engine reading "today" from `clock`. The home jurisdiction
    /// must be a known code.
    pub fn with_clock(mut config: EngineConfig, clock: C) -> Result<Self, TaxError> {
        let home = jurisdiction::lookup(&config.home_jurisdiction)?;
        config.home_jurisdiction = home.code.to_string();
        Ok(TaxEngine {
            config,
            home,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn home(&self) -> &'static Jurisdiction {
        self.home
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Tax on `amount` in `jurisdiction`; unknown codes are rejected.
    /// Exempt supplies return a zero breakdown without checking the code.
    pub fn calculate_transaction_tax(
        &self,
        amount: Decimal,
        jurisdiction: &str,
        taxable: bool,
    ) -> Result<TaxBreakdown, TaxError> {
        if !taxable {
            return Ok(TaxBreakdown::exempt(check_amount(amount)?));
        }
        let j = jurisdiction::lookup(jurisdiction)?;
        TaxBreakdown::compute(amount, &j.rate)
    }

    /// Sales are taxed where the supply is made. Purchases are claimed under
    /// the registrant's home rules wherever they were made.
    pub fn determine_applicable_jurisdiction(&self, transaction: &Transaction) -> String {
        if transaction.is_income() {
            jurisdiction::normalize_code(&transaction.jurisdiction)
        } else {
            self.home.code.to_string()
        }
    }

    /// Fails if any expense amount is out of range.
    pub fn calculate_itc(&self, expenses: &[Transaction]) -> Result<ItcResult, TaxError> {
        let mut result = ItcResult::default();

        for expense in expenses {
            check_amount(expense.amount)?;
            if !expense.taxable {
                result.ineligible_amount += expense.amount;
                log::debug!("ITC {}: not taxable, {} ineligible", expense.id, expense.amount);
                continue;
            }
            if !is_eligible_for_itc(expense) {
                result.ineligible_amount += expense.amount;
                log::debug!(
                    "ITC {}: description {:?} is not eligible",
                    expense.id,
                    expense.description
                );
                continue;
            }

            result.eligible_amount += expense.amount;
            let rate = jurisdiction::rate_of(&expense.jurisdiction);
            let tax = TaxBreakdown::compute(expense.amount, rate)?;

            if rate.has_hst() {
                result.hst_itc += tax.hst;
                log::debug!("ITC {}: HST {}", expense.id, tax.hst);
            } else {
                result.gst_itc += tax.gst;
                let recoverable = is_pst_recoverable(expense, rate);
                if recoverable {
                    result.pst_itc += tax.pst;
                }
                log::debug!(
                    "ITC {}: GST {}, provincial {} (recoverable: {})",
                    expense.id,
                    tax.gst,
                    tax.pst,
                    recoverable
                );
            }
        }

        result.eligible_amount = round2(result.eligible_amount);
        result.ineligible_amount = round2(result.ineligible_amount);
        result.gst_itc = round2(result.gst_itc);
        result.pst_itc = round2(result.pst_itc);
        result.hst_itc = round2(result.hst_itc);
        result.total_itc = round2(result.gst_itc + result.hst_itc + result.pst_itc);
        Ok(result)
    }

    /// Net collected tax against input tax credits for transactions dated
    /// within `period`.
    pub fn calculate_remittance(
        &self,
        income: &[Transaction],
        expenses: &[Transaction],
        period: DateRange,
    ) -> Result<RemittanceResult, TaxError> {
        let mut gst_hst_collected = Decimal::ZERO;
        let mut pst_collected = Decimal::ZERO;

        for sale in in_range(income, period).filter(|t| t.taxable) {
            let rate = jurisdiction::rate_of(&sale.jurisdiction);
            let tax = TaxBreakdown::compute(sale.amount, rate)?;
            let federal = if rate.has_hst() { tax.hst } else { tax.gst };
            gst_hst_collected += federal;
            pst_collected += tax.pst;
            log::debug!(
                "Collected on {}: GST/HST {}, provincial {}",
                sale.id,
                federal,
                tax.pst
            );
        }

        let period_expenses: Vec<Transaction> = in_range(expenses, period).cloned().collect();
        let itc = self.calculate_itc(&period_expenses)?;

        let gst_hst_collected = round2(gst_hst_collected);
        let pst_collected = round2(pst_collected);
        let gst_hst_paid = round2(itc.gst_itc + itc.hst_itc);
        let pst_paid = itc.pst_itc;
        let net_gst_hst = round2(gst_hst_collected - gst_hst_paid);
        let net_pst = round2(pst_collected - pst_paid);

        let period = FilingPeriod::new(period, self.config.filing_frequency);
        let due_date = period
            .due_date()
            .ok_or(TaxError::DateOutOfRange(period.end))?;

        Ok(RemittanceResult {
            period,
            gst_hst_collected,
            gst_hst_paid,
            net_gst_hst,
            pst_collected,
            pst_paid,
            net_pst,
            total_remittance: round2(net_gst_hst + net_pst),
            due_date,
            is_overdue: self.clock.today() > due_date,
        })
    }

    /// Name of the return this registrant files
    pub fn return_kind(&self) -> &'static str {
        if self.home.rate.has_qst() {
            "GST/QST"
        } else {
            "GST/HST"
        }
    }

    /// Filing deadlines from today out to `months_ahead`, soonest first
    pub fn get_upcoming_deadlines(&self, months_ahead: u32) -> Vec<Deadline> {
        filing::upcoming_deadlines(
            self.config.filing_frequency,
            self.clock.today(),
            months_ahead,
            self.return_kind(),
        )
    }

    /// Compare `candidate` against the engine's own breakdown for `amount`.
    /// Differences above a cent are reported, not raised.
    pub fn validate_tax_calculation(
        &self,
        amount: Decimal,
        candidate: &TaxBreakdown,
        jurisdiction: &str,
    ) -> Result<ValidationResult, TaxError> {
        let expected = self.calculate_transaction_tax(amount, jurisdiction, true)?;

        let checks = [
            ("GST", expected.gst, candidate.gst),
            ("PST", expected.pst, candidate.pst),
            ("HST", expected.hst, candidate.hst),
            ("Total tax", expected.total_tax, candidate.total_tax),
        ];
        let errors: Vec<String> = checks
            .iter()
            .filter(|(_, expected, actual)| {
                expected
                    .checked_sub(*actual)
                    .map_or(true, |diff| diff.abs() > VALIDATION_TOLERANCE)
            })
            .map(|(label, expected, actual)| {
                format!("{label} mismatch: expected {expected:.2}, got {actual:.2}")
            })
            .collect();

        Ok(ValidationResult {
            is_valid: errors.is_empty(),
            errors,
        })
    }
}
