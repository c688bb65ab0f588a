//! Validate command - reconcile a tax breakdown from an invoice or receipt

use crate::cmd::{parse_amount, print_json, EngineArgs};
use crate::core::{round2, TaxBreakdown};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Pre-tax amount in dollars
    #[arg(allow_negative_numbers = true, value_parser = parse_amount)]
    amount: Decimal,

    /// Province or territory code
    #[arg(short, long)]
    jurisdiction: String,

    /// GST charged
    #[arg(
        long,
        default_value_t = Decimal::ZERO,
        allow_negative_numbers = true,
        value_parser = parse_amount
    )]
    gst: Decimal,

    /// PST or QST charged
    #[arg(
        long,
        default_value_t = Decimal::ZERO,
        allow_negative_numbers = true,
        value_parser = parse_amount
    )]
    pst: Decimal,

    /// HST charged
    #[arg(
        long,
        default_value_t = Decimal::ZERO,
        allow_negative_numbers = true,
        value_parser = parse_amount
    )]
    hst: Decimal,

    /// Total tax charged (defaults to the sum of the components)
    #[arg(long, allow_negative_numbers = true, value_parser = parse_amount)]
    total: Option<Decimal>,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    jurisdiction: String,
    is_valid: bool,
    errors: Vec<String>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let engine = self.engine.engine()?;
        let total_tax = self.total.unwrap_or(self.gst + self.pst + self.hst);
        let candidate = TaxBreakdown {
            gst: self.gst,
            pst: self.pst,
            hst: self.hst,
            total_tax,
            before_tax: self.amount,
            after_tax: round2(self.amount + total_tax),
        };

        let result = engine.validate_tax_calculation(self.amount, &candidate, &self.jurisdiction)?;

        if self.json {
            print_json(&ValidationOutput {
                jurisdiction: self.jurisdiction.to_uppercase(),
                is_valid: result.is_valid,
                errors: result.errors.clone(),
            })?;
        } else if result.is_valid {
            println!("\u{2713} Tax breakdown is correct.");
        } else {
            println!("\u{26A0} {} issue(s) found:", result.errors.len());
            for (i, error) in result.errors.iter().enumerate() {
                println!("  {}. {}", i + 1, error);
            }
        }

        // Exit with code 1 if the breakdown does not reconcile
        if !result.is_valid {
            std::process::exit(1);
        }
        Ok(())
    }
}
