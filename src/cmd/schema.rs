//! Schema command - print expected input formats

use crate::core::{EngineConfig, Transaction, TransactionInput};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the transaction input file
    JsonSchema,
    /// JSON Schema for the engine configuration file
    ConfigSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(TransactionInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::ConfigSchema => {
                let schema = schema_for!(EngineConfig);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", Transaction::csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for field in Transaction::csv_schema() {
        let req = if field.required { "required" } else { "optional" };
        println!("{:14} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("Amounts are in dollars; dates are YYYY-MM-DD; type is income or expense");
}
