pub mod calc;
pub mod deadlines;
pub mod itc;
pub mod rates;
pub mod remit;
pub mod schema;
pub mod summary;
pub mod tax;
pub mod validate;

use crate::core::transaction::{self, DateRange, Transaction};
use crate::core::{
    check_amount, format_cad, Clock, EngineConfig, FilingFrequency, FixedClock, SystemClock,
    TaxBreakdown, TaxEngine,
};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Read transactions from CSV or JSON (or JSON on stdin with "-")
pub fn read_transactions(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    let transactions = if path.as_os_str() == "-" {
        read_from_stdin()?
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let reader = BufReader::new(file);
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let parsed = if is_csv {
            transaction::read_csv(reader)
        } else {
            transaction::read_json(reader)
        };
        parsed.with_context(|| format!("reading transactions from {}", path.display()))?
    };
    log::info!("Read {} transactions", transactions.len());
    Ok(transactions)
}

fn read_from_stdin() -> anyhow::Result<Vec<Transaction>> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    transaction::read_json(io::Cursor::new(buffer))
}

/// Parse a dollar amount, rejecting values too large to calculate with
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let amount: Decimal = s.trim().parse().map_err(|e| format!("{e}"))?;
    check_amount(amount).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Quarterly,
    Annual,
}

impl From<FrequencyArg> for FilingFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => FilingFrequency::Monthly,
            FrequencyArg::Quarterly => FilingFrequency::Quarterly,
            FrequencyArg::Annual => FilingFrequency::Annual,
        }
    }
}

/// Registrant settings shared by the engine-backed commands
#[derive(Args, Debug)]
pub struct EngineArgs {
    /// JSON file with engine configuration
    #[arg(long, env = "CANTAX_CONFIG")]
    config: Option<PathBuf>,

    /// Home province or territory (overrides the config file)
    #[arg(long, env = "CANTAX_HOME")]
    home: Option<String>,

    /// Filing frequency (overrides the config file)
    #[arg(long, value_enum, env = "CANTAX_FREQUENCY")]
    frequency: Option<FrequencyArg>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl EngineArgs {
    pub fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file =
                    File::open(path).with_context(|| format!("opening {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => EngineConfig::default(),
        };
        if let Some(home) = &self.home {
            config.home_jurisdiction = home.clone();
        }
        if let Some(frequency) = self.frequency {
            config.filing_frequency = frequency.into();
        }
        Ok(config)
    }

    pub fn engine(&self) -> anyhow::Result<TaxEngine<FixedClock>> {
        let config = self.load_config()?;
        let today = self.today.unwrap_or_else(|| SystemClock.today());
        log::debug!(
            "Engine: home {}, {} filer, today {}",
            config.home_jurisdiction,
            config.filing_frequency,
            today
        );
        Ok(TaxEngine::with_clock(config, FixedClock(today))?)
    }
}

/// Optional inclusive date bounds
#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl PeriodArgs {
    /// Both bounds, or neither
    pub fn range(&self) -> anyhow::Result<Option<DateRange>> {
        match (self.from, self.to) {
            (Some(start), Some(end)) if start > end => {
                anyhow::bail!("--from {} is after --to {}", start, end)
            }
            (Some(start), Some(end)) => Ok(Some(DateRange::new(start, end))),
            (None, None) => Ok(None),
            _ => anyhow::bail!("--from and --to must be given together"),
        }
    }
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Component")]
    component: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Print a breakdown as a two-column table, omitting zero tax components
pub fn print_breakdown(breakdown: &TaxBreakdown) {
    let mut rows = vec![BreakdownRow {
        component: "Before tax",
        amount: format_cad(breakdown.before_tax),
    }];
    for (component, amount) in [
        ("GST", breakdown.gst),
        ("PST", breakdown.pst),
        ("HST", breakdown.hst),
    ] {
        if !amount.is_zero() {
            rows.push(BreakdownRow {
                component,
                amount: format_cad(amount),
            });
        }
    }
    rows.push(BreakdownRow {
        component: "Total tax",
        amount: format_cad(breakdown.total_tax),
    });
    rows.push(BreakdownRow {
        component: "After tax",
        amount: format_cad(breakdown.after_tax),
    });

    print_table(rows);
}

/// Print rows with the house style: rounded borders, amounts right-aligned
pub fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
