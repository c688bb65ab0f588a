//! Calc command - quick tax on an amount, forward or tax-inclusive

use crate::cmd::{parse_amount, print_breakdown, print_json};
use crate::core::{calculator, jurisdiction};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Amount in dollars (negative for refunds)
    #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
    amount: Decimal,

    /// Province or territory code. Unknown codes are calculated as Ontario.
    #[arg(short, long, default_value = jurisdiction::DEFAULT_JURISDICTION)]
    jurisdiction: String,

    /// Treat the amount as tax-inclusive and back out the tax
    #[arg(short, long)]
    inclusive: bool,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let breakdown = if self.inclusive {
            calculator::inverse(self.amount, &self.jurisdiction)?
        } else {
            calculator::forward(self.amount, &self.jurisdiction)?
        };

        if self.json {
            return print_json(&breakdown);
        }

        let j = jurisdiction::resolve(&self.jurisdiction);
        println!();
        println!("{} ({})", j.name, j.code);
        print_breakdown(&breakdown);
        Ok(())
    }
}
