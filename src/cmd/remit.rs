//! Remit command - net GST/HST and provincial tax owed for a filing period

use crate::cmd::{print_json, print_table, read_transactions, EngineArgs, PeriodArgs};
use crate::core::jurisdiction::Jurisdiction;
use crate::core::transaction::partition;
use crate::core::{format_cad, FilingPeriod, RemittanceResult};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct RemitCommand {
    /// CSV or JSON file containing transactions ("-" for JSON on stdin)
    #[arg(short, long, default_value = "-")]
    transactions: PathBuf,

    // Defaults to the last closed filing period
    #[command(flatten)]
    period: PeriodArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct RemittanceRow {
    #[tabled(rename = "Tax")]
    tax: &'static str,
    #[tabled(rename = "Collected")]
    collected: String,
    #[tabled(rename = "ITCs")]
    paid: String,
    #[tabled(rename = "Net")]
    net: String,
}

impl RemitCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let engine = self.engine.engine()?;
        let range = match self.period.range()? {
            Some(range) => range,
            None => FilingPeriod::containing(engine.today(), engine.config().filing_frequency)
                .and_then(|current| current.previous())
                .map(|period| period.range())
                .with_context(|| format!("no closed filing period before {}", engine.today()))?,
        };

        let transactions = read_transactions(&self.transactions)?;
        let (income, expenses) = partition(&transactions);
        log::info!(
            "{} income and {} expense transactions before period filter",
            income.len(),
            expenses.len()
        );

        let result = engine.calculate_remittance(&income, &expenses, range)?;

        if self.json {
            return print_json(&result);
        }
        self.print_report(
            &result,
            engine.home(),
            engine.config().gst_hst_number.as_deref(),
        );
        Ok(())
    }

    fn print_report(
        &self,
        result: &RemittanceResult,
        home: &Jurisdiction,
        registration: Option<&str>,
    ) {
        println!();
        println!(
            "REMITTANCE {} ({} filer)",
            result.period.label(),
            result.period.frequency
        );
        println!("Home: {} ({})", home.name, home.code);
        if let Some(number) = registration {
            println!("Registration: {}", number);
        }
        println!();

        let mut rows = vec![RemittanceRow {
            tax: "GST/HST",
            collected: format_cad(result.gst_hst_collected),
            paid: format_cad(result.gst_hst_paid),
            net: format_cad(result.net_gst_hst),
        }];
        if !result.pst_collected.is_zero() || !result.pst_paid.is_zero() {
            rows.push(RemittanceRow {
                tax: "PST/QST",
                collected: format_cad(result.pst_collected),
                paid: format_cad(result.pst_paid),
                net: format_cad(result.net_pst),
            });
        }
        print_table(rows);
        println!();

        let label = if result.total_remittance < Decimal::ZERO {
            "REFUND DUE"
        } else {
            "TOTAL REMITTANCE"
        };
        println!("{}: {}", label, format_cad(result.total_remittance.abs()));

        let status = if result.is_overdue { " (OVERDUE)" } else { "" };
        println!("Due: {}{}", result.due_date.format("%Y-%m-%d"), status);
        println!();
    }
}
