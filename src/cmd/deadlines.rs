//! Deadlines command - upcoming filing due dates

use crate::cmd::{print_json, print_table, EngineArgs};
use crate::core::filing::MAX_MONTHS_AHEAD;
use crate::core::FilingFrequency;
use clap::Args;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct DeadlinesCommand {
    /// How far ahead to look, in months
    #[arg(
        short,
        long,
        default_value_t = 12,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_MONTHS_AHEAD))
    )]
    months: u32,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct DeadlineRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Return")]
    kind: String,
    #[tabled(rename = "Due")]
    due_date: String,
    #[tabled(rename = "Days")]
    days_until_due: i64,
}

impl DeadlinesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let engine = self.engine.engine()?;
        let deadlines = engine.get_upcoming_deadlines(self.months);

        if self.json {
            return print_json(&deadlines);
        }

        if deadlines.is_empty() {
            if engine.config().filing_frequency == FilingFrequency::Annual {
                println!("Deadline listing is not available for annual filers");
            } else {
                println!("No upcoming deadlines");
            }
            return Ok(());
        }

        let rows: Vec<DeadlineRow> = deadlines
            .into_iter()
            .map(|d| DeadlineRow {
                period: d.period,
                kind: d.kind,
                due_date: d.due_date.format("%Y-%m-%d").to_string(),
                days_until_due: d.days_until_due,
            })
            .collect();
        print_table(rows);
        Ok(())
    }
}
