//! Permissive sales tax calculator.
//!
//! Every function here accepts any jurisdiction code: unknown codes are
//! computed under the default jurisdiction instead of failing. Use
//! [`TaxEngine`](super::engine::TaxEngine) for strict validation.

use super::error::TaxError;
use super::jurisdiction::{self, JurisdictionRate, JurisdictionSummary};
use super::money::{check_amount, round2};
use super::transaction::{in_range, DateRange, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

/// Tax components of an amount, each rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaxBreakdown {
    pub gst: Decimal,
    /// Provincial tax, including QST
    pub pst: Decimal,
    pub hst: Decimal,
    pub total_tax: Decimal,
    pub before_tax: Decimal,
    pub after_tax: Decimal,
}

impl TaxBreakdown {
    /// Breakdown of an amount that carries no tax
    pub fn exempt(amount: Decimal) -> Self {
        TaxBreakdown {
            gst: Decimal::ZERO,
            pst: Decimal::ZERO,
            hst: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            before_tax: amount,
            after_tax: amount,
        }
    }

    /// Apply `rate` to `amount`. Components are rounded before they are summed.
    /// Fails if the amount is beyond [`MAX_AMOUNT`](super::money::MAX_AMOUNT).
    pub fn compute(amount: Decimal, rate: &JurisdictionRate) -> Result<Self, TaxError> {
        let amount = check_amount(amount)?;
        let gst = round2(amount * rate.gst);
        let pst = round2(amount * rate.provincial());
        let hst = round2(amount * rate.hst);
        let total_tax = round2(gst + pst + hst);
        Ok(TaxBreakdown {
            gst,
            pst,
            hst,
            total_tax,
            before_tax: amount,
            after_tax: round2(amount + total_tax),
        })
    }
}

/// Rate fractions of a jurisdiction with their sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateInfo {
    pub code: &'static str,
    pub gst: Decimal,
    pub pst: Decimal,
    pub hst: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qst: Option<Decimal>,
    pub total_rate: Decimal,
}

/// Expense totals over a reporting period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterlySummary {
    pub period: DateRange,
    pub count: usize,
    pub total_amount: Decimal,
    pub total_tax_paid: Decimal,
    pub input_tax_credits: Decimal,
}

/// Tax on a pre-tax amount. Negative amounts (refunds) give negative tax.
/// Only out-of-range amounts fail; unknown codes never do.
pub fn forward(amount: Decimal, jurisdiction: &str) -> Result<TaxBreakdown, TaxError> {
    TaxBreakdown::compute(amount, jurisdiction::rate_of(jurisdiction))
}

/// Recover the pre-tax base of a tax-inclusive amount, then tax it forward.
///
/// The recovered base is left unrounded. Because components are rounded
/// independently, it is only within a cent of the base that produced
/// `total_amount`.
pub fn inverse(total_amount: Decimal, jurisdiction: &str) -> Result<TaxBreakdown, TaxError> {
    let total_amount = check_amount(total_amount)?;
    let rate = jurisdiction::rate_of(jurisdiction);
    let base = total_amount / (Decimal::ONE + rate.total_rate());
    TaxBreakdown::compute(base, rate)
}

pub fn rates_of(jurisdiction: &str) -> RateInfo {
    let j = jurisdiction::resolve(jurisdiction);
    RateInfo {
        code: j.code,
        gst: j.rate.gst,
        pst: j.rate.pst,
        hst: j.rate.hst,
        qst: j.rate.qst,
        total_rate: j.rate.total_rate(),
    }
}

pub fn all_jurisdictions() -> Vec<JurisdictionSummary> {
    jurisdiction::all_jurisdictions()
}

/// Sum expenses dated within `period`. Every dollar of tax paid is reported
/// as an input tax credit; eligibility rules live in the engine.
pub fn quarterly_summary(
    expenses: &[Transaction],
    period: DateRange,
) -> Result<QuarterlySummary, TaxError> {
    let mut count = 0;
    let mut total_amount = Decimal::ZERO;
    let mut total_tax_paid = Decimal::ZERO;
    for e in in_range(expenses, period) {
        count += 1;
        total_amount += check_amount(e.amount)?;
        total_tax_paid += check_amount(e.tax_amount)?;
    }
    let total_tax_paid = round2(total_tax_paid);

    Ok(QuarterlySummary {
        period,
        count,
        total_amount: round2(total_amount),
        total_tax_paid,
        input_tax_credits: total_tax_paid,
    })
}
