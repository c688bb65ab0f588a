//! Rates command - the jurisdiction rate table

use crate::cmd::{print_json, print_table};
use crate::core::jurisdiction::{self, Jurisdiction};
use crate::core::{calculator, format_rate};
use clap::Args;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Show a single province or territory
    #[arg(short, long)]
    jurisdiction: Option<String>,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct RateRow {
    #[tabled(rename = "Code")]
    code: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "GST")]
    gst: String,
    #[tabled(rename = "PST")]
    pst: String,
    #[tabled(rename = "HST")]
    hst: String,
    #[tabled(rename = "Provincial Tax")]
    provincial_tax: &'static str,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&Jurisdiction> for RateRow {
    fn from(j: &Jurisdiction) -> Self {
        RateRow {
            code: j.code,
            name: j.name,
            gst: format_rate(j.rate.gst),
            pst: format_rate(j.rate.provincial()),
            hst: format_rate(j.rate.hst),
            provincial_tax: j.rate.provincial_tax_name.unwrap_or("-"),
            total: format_rate(j.rate.total_rate()),
        }
    }
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match &self.jurisdiction {
            Some(code) => {
                if self.json {
                    return print_json(&calculator::rates_of(code));
                }
                print_table(vec![RateRow::from(jurisdiction::resolve(code))]);
            }
            None => {
                if self.json {
                    return print_json(&calculator::all_jurisdictions());
                }
                let rows: Vec<RateRow> = calculator::all_jurisdictions()
                    .iter()
                    .filter_map(|s| jurisdiction::lookup(s.code).ok())
                    .map(RateRow::from)
                    .collect();
                print_table(rows);
            }
        }
        Ok(())
    }
}
