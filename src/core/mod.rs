pub mod calculator;
pub mod clock;
pub mod engine;
pub mod error;
pub mod filing;
pub mod jurisdiction;
pub mod money;
pub mod transaction;

pub use calculator::{quarterly_summary, TaxBreakdown};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{EngineConfig, ItcResult, RemittanceResult, TaxEngine};
pub use filing::{FilingFrequency, FilingPeriod};
pub use money::{check_amount, format_cad, format_rate, round2};
pub use transaction::{DateRange, Transaction, TransactionInput};
