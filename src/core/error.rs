use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Errors raised by the calculation and engine paths.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid jurisdiction: {0}")]
    InvalidJurisdiction(String),
    #[error("amount out of range: {0} (limit is {max})", max = super::money::MAX_AMOUNT)]
    AmountOutOfRange(Decimal),
    #[error("no filing deadline for a period ending {0}")]
    DateOutOfRange(NaiveDate),
}
