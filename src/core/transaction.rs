use cantax_derive::CsvSchema;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Column description generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Whether a transaction collects tax (sale) or pays it (purchase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn display(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Input root for transaction JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionInput {
    pub transactions: Vec<Transaction>,
}

/// A sale or purchase, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct Transaction {
    /// Identifier of the source record
    pub id: String,
    /// Transaction date (YYYY-MM-DD)
    #[schemars(with = "String")]
    pub date: NaiveDate,
    /// income or expense
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Pre-tax amount in dollars
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Tax actually charged or paid, in dollars
    #[serde(default)]
    #[schemars(with = "f64")]
    pub tax_amount: Decimal,
    /// Province or territory code (e.g. ON, BC, QC)
    pub jurisdiction: String,
    /// Whether the supply is subject to sales tax (defaults to true)
    #[serde(default = "default_taxable")]
    pub taxable: bool,
    /// Free-text description, used for ITC eligibility
    #[serde(default)]
    pub description: Option<String>,
}

fn default_taxable() -> bool {
    true
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Keep transactions dated within `range`
pub fn in_range<'a>(
    transactions: &'a [Transaction],
    range: DateRange,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    transactions.iter().filter(move |t| range.contains(t.date))
}

/// Split transactions into (income, expense)
pub fn partition(transactions: &[Transaction]) -> (Vec<Transaction>, Vec<Transaction>) {
    transactions.iter().cloned().partition(Transaction::is_income)
}

/// Read transactions from CSV
pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut transactions = rdr
        .deserialize::<Transaction>()
        .collect::<Result<Vec<_>, _>>()?;
    transactions.sort_by_key(|t| t.date);
    Ok(transactions)
}

/// Read transactions from JSON
pub fn read_json<R: Read>(reader: R) -> anyhow::Result<Vec<Transaction>> {
    let input: TransactionInput = serde_json::from_reader(reader)?;
    let mut transactions = input.transactions;
    transactions.sort_by_key(|t| t.date);
    Ok(transactions)
}
