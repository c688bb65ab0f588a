//! Tax command - strict per-transaction tax determination

use crate::cmd::{parse_amount, print_breakdown, print_json, EngineArgs};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct TaxCommand {
    /// Pre-tax amount in dollars
    #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
    amount: Decimal,

    /// Province or territory code where the supply is made
    #[arg(short, long)]
    jurisdiction: String,

    /// The supply is exempt or zero-rated
    #[arg(long)]
    exempt: bool,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl TaxCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let engine = self.engine.engine()?;
        let breakdown =
            engine.calculate_transaction_tax(self.amount, &self.jurisdiction, !self.exempt)?;

        if self.json {
            return print_json(&breakdown);
        }
        print_breakdown(&breakdown);
        Ok(())
    }
}
