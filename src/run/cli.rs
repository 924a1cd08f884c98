use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::error::ValidationError;
use crate::month::normalize_month;

#[derive(Parser, Debug)]
#[command(
    name = "spendo",
    version,
    about = "Spendo - local expense and income tracker"
)]
pub(crate) struct Cli {
    /// SQLite database file (overrides SPENDO_DB and config.toml)
    #[arg(long, global = true)]
    pub(crate) db: Option<PathBuf>,

    /// User whose records are read and written (overrides SPENDO_USER)
    #[arg(long, global = true)]
    pub(crate) user: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Import a spreadsheet (.xlsx, .xls, .xlsm, .ods), .csv or .json file
    Upload {
        file: PathBuf,

        /// Book amounts as money in instead of money out
        #[arg(long)]
        income: bool,

        /// Check every row and show what would be saved, without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Add one record
    Add(AddArgs),

    /// List records for a month (default: current month) or `all`
    List {
        #[arg(value_parser = parse_period)]
        period: Option<Period>,
    },

    /// Months that have records, newest first
    Months,

    /// Change fields of an existing record
    Edit {
        id: i64,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete a record
    Delete { id: i64 },

    /// Totals and category breakdown for a month (default: current month) or `all`
    Summary {
        #[arg(value_parser = parse_period)]
        period: Option<Period>,
    },

    /// Compare the totals of two months
    Compare {
        #[arg(value_parser = parse_month)]
        first: String,

        #[arg(value_parser = parse_month)]
        second: String,
    },

    /// Chart data
    Chart {
        #[command(subcommand)]
        command: ChartCommand,
    },

    /// Saved categories
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct AddArgs {
    /// Month, e.g. 2025-06, "June 2025" or Jun2025
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: String,

    #[arg(long)]
    pub(crate) category: String,

    /// Item name
    #[arg(long)]
    pub(crate) item: Option<String>,

    /// Amount; defaults to the larger of money in and money out
    #[arg(long)]
    pub(crate) amount: Option<Decimal>,

    #[arg(long)]
    pub(crate) money_in: Option<Decimal>,

    #[arg(long)]
    pub(crate) money_out: Option<Decimal>,

    /// With only --amount given, book it as money in instead of money out
    #[arg(long)]
    pub(crate) income: bool,

    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct EditArgs {
    #[arg(long, value_parser = parse_month)]
    pub(crate) month: Option<String>,

    #[arg(long)]
    pub(crate) category: Option<String>,

    #[arg(long)]
    pub(crate) item: Option<String>,

    #[arg(long)]
    pub(crate) amount: Option<Decimal>,

    #[arg(long)]
    pub(crate) money_in: Option<Decimal>,

    #[arg(long)]
    pub(crate) money_out: Option<Decimal>,

    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ChartCommand {
    /// Month totals, oldest first
    Monthly {
        /// Number of most recent months (default from config, 12)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Money out by category for a month or `all`
    Category {
        #[arg(value_parser = parse_period)]
        period: Period,
    },

    /// Month-over-month growth
    Trend {
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum CategoriesCommand {
    /// Saved categories plus categories already used on records
    List,

    /// Save a category for reuse
    Add { name: String },
}

/// A single canonical month, or every month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Period {
    Month(String),
    AllTime,
}

pub(crate) fn parse_period(input: &str) -> Result<Period, ValidationError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("all-time") {
        return Ok(Period::AllTime);
    }
    parse_month(trimmed).map(Period::Month)
}

pub(crate) fn parse_month(input: &str) -> Result<String, ValidationError> {
    normalize_month(input).ok_or_else(|| ValidationError::InvalidMonth(input.trim().to_string()))
}
