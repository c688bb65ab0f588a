use clap::{Parser, Subcommand};

mod cmd;
mod core;

#[derive(Parser, Debug)]
#[command(name = "cantax", version, about = "Canadian sales tax (GST/HST/PST/QST) calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tax on an amount (unknown jurisdictions are calculated as Ontario)
    Calc(cmd::calc::CalcCommand),
    /// Sales tax rates by province and territory
    Rates(cmd::rates::RatesCommand),
    /// Tax on a transaction, rejecting unknown jurisdictions
    Tax(cmd::tax::TaxCommand),
    /// Input tax credits claimable on expenses
    Itc(cmd::itc::ItcCommand),
    /// Net tax to remit for a filing period
    Remit(cmd::remit::RemitCommand),
    /// Expense totals and tax paid over a period
    Summary(cmd::summary::SummaryCommand),
    /// Upcoming filing deadlines
    Deadlines(cmd::deadlines::DeadlinesCommand),
    /// Check a tax breakdown against the calculated one
    Validate(cmd::validate::ValidateCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Calc(calc) => calc.exec(),
        Command::Rates(rates) => rates.exec(),
        Command::Tax(tax) => tax.exec(),
        Command::Itc(itc) => itc.exec(),
        Command::Remit(remit) => remit.exec(),
        Command::Summary(summary) => summary.exec(),
        Command::Deadlines(deadlines) => deadlines.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
