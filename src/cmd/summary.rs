//! Summary command - expense totals and tax paid over a period

use crate::cmd::{print_json, read_transactions};
use crate::core::{format_cad, quarterly_summary, DateRange, Transaction};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// CSV or JSON file containing transactions ("-" for JSON on stdin)
    #[arg(short, long, default_value = "-")]
    transactions: PathBuf,

    /// First day of the period (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the period (YYYY-MM-DD)
    #[arg(long)]
    to: NaiveDate,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.from > self.to {
            anyhow::bail!("--from {} is after --to {}", self.from, self.to);
        }
        let expenses: Vec<Transaction> = read_transactions(&self.transactions)?
            .into_iter()
            .filter(Transaction::is_expense)
            .collect();

        let summary = quarterly_summary(&expenses, DateRange::new(self.from, self.to))?;

        if self.json {
            return print_json(&summary);
        }

        println!();
        println!("EXPENSE SUMMARY ({})", summary.period);
        println!();
        println!("  Expenses: {}", summary.count);
        println!("  Total amount: {}", format_cad(summary.total_amount));
        println!("  Tax paid: {}", format_cad(summary.total_tax_paid));
        println!("  Input tax credits: {}", format_cad(summary.input_tax_credits));
        println!();
        Ok(())
    }
}
