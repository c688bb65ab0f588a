//! ITC command - input tax credits claimable on expenses

use crate::cmd::{print_json, print_table, read_transactions, EngineArgs, PeriodArgs};
use crate::core::transaction::in_range;
use crate::core::engine::is_eligible_for_itc;
use crate::core::{format_cad, Clock, ItcResult, TaxEngine, Transaction};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ItcCommand {
    /// CSV or JSON file containing transactions ("-" for JSON on stdin)
    #[arg(short, long, default_value = "-")]
    transactions: PathBuf,

    #[command(flatten)]
    period: PeriodArgs,

    #[command(flatten)]
    engine: EngineArgs,

    /// List each expense with its eligibility
    #[arg(long)]
    detail: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize, Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Jurisdiction")]
    jurisdiction: String,
    #[tabled(rename = "Claimed Under")]
    claimed_under: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Eligible")]
    eligible: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Debug, Serialize)]
struct ItcOutput<'a> {
    expense_count: usize,
    #[serde(flatten)]
    result: &'a ItcResult,
}

impl ItcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let engine = self.engine.engine()?;
        let transactions = read_transactions(&self.transactions)?;
        let expenses: Vec<Transaction> = match self.period.range()? {
            Some(range) => in_range(&transactions, range)
                .filter(|t| t.is_expense())
                .cloned()
                .collect(),
            None => transactions.into_iter().filter(|t| t.is_expense()).collect(),
        };
        log::info!("{} expenses in scope", expenses.len());

        let result = engine.calculate_itc(&expenses)?;

        if self.json {
            return print_json(&ItcOutput {
                expense_count: expenses.len(),
                result: &result,
            });
        }

        if self.detail {
            print_table(expense_rows(&engine, &expenses));
        }

        println!();
        println!("INPUT TAX CREDITS ({} expenses)", expenses.len());
        println!(
            "  Eligible: {} | Ineligible: {}",
            format_cad(result.eligible_amount),
            format_cad(result.ineligible_amount)
        );
        println!(
            "  GST: {} | HST: {} | PST/QST: {}",
            format_cad(result.gst_itc),
            format_cad(result.hst_itc),
            format_cad(result.pst_itc)
        );
        println!("  TOTAL ITC: {}", format_cad(result.total_itc));
        println!();
        Ok(())
    }
}

fn expense_rows<C: Clock>(engine: &TaxEngine<C>, expenses: &[Transaction]) -> Vec<ExpenseRow> {
    expenses
        .iter()
        .map(|e| ExpenseRow {
            date: e.date.format("%Y-%m-%d").to_string(),
            id: e.id.clone(),
            jurisdiction: e.jurisdiction.to_uppercase(),
            claimed_under: engine.determine_applicable_jurisdiction(e),
            amount: format_cad(e.amount),
            eligible: if e.taxable && is_eligible_for_itc(e) {
                "yes"
            } else {
                "no"
            },
            description: e.description.clone().unwrap_or_default(),
        })
        .collect()
}
