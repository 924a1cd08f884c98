mod cli;
mod view;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;

use crate::config::Settings;
use crate::db::Database;
use crate::error::{InvalidEntry, ValidationError};
use crate::import;
use crate::models::{Direction, TransactionRecord};
use crate::month::current_month;
use crate::report::{
    aggregate_by_category, aggregate_by_month, build_trend, compare, recent_months, summarize,
    CategoryScope,
};

pub(crate) use cli::{AddArgs, CategoriesCommand, ChartCommand, Cli, Command, EditArgs, Period};
pub(crate) use view::Output;
use view::*;

/// Run one command for `settings.user` against `db`.
pub(crate) fn dispatch(command: Command, db: &mut Database, settings: &Settings) -> Result<Output> {
    let user = settings.user.as_str();
    tracing::info!(?command, user, "running command");
    match command {
        Command::Upload {
            file,
            income,
            dry_run,
        } => upload(db, user, &file, income, dry_run),
        Command::Add(args) => add(db, user, args),
        Command::List { period } => list(db, user, period.unwrap_or_else(this_month)),
        Command::Months => months(db, user),
        Command::Edit { id, changes } => edit(db, user, id, changes),
        Command::Delete { id } => delete(db, user, id),
        Command::Summary { period } => summary(db, user, period.unwrap_or_else(this_month)),
        Command::Compare { first, second } => compare_months(db, user, &first, &second),
        Command::Chart { command } => match command {
            ChartCommand::Monthly { limit } => {
                chart_monthly(db, user, limit.unwrap_or(settings.chart_limit))
            }
            ChartCommand::Category { period } => chart_category(db, user, period),
            ChartCommand::Trend { limit } => {
                chart_trend(db, user, limit.unwrap_or(settings.chart_limit))
            }
        },
        Command::Categories { command } => match command {
            CategoriesCommand::List => categories(db, user),
            CategoriesCommand::Add { name } => add_category(db, user, &name),
        },
    }
}

/// Print `output` as text or pretty JSON on stdout.
pub(crate) fn print(output: &Output, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(output).context("Failed to serialize output")?
        );
    } else {
        print!("{output}");
    }
    Ok(())
}

fn this_month() -> Period {
    Period::Month(current_month())
}

fn fetch(db: &Database, user: &str, period: &Period) -> Result<Vec<TransactionRecord>> {
    let month = match period {
        Period::Month(m) => Some(m.as_str()),
        Period::AllTime => None,
    };
    db.get_records(user, month)
        .with_context(|| format!("Failed to load records for '{user}'"))
}

// ── Records ───────────────────────────────────────────────────

fn upload(db: &mut Database, user: &str, file: &Path, income: bool, dry_run: bool) -> Result<Output> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let direction = if income {
        Direction::MoneyIn
    } else {
        Direction::MoneyOut
    };

    let rows = import::read_rows(file)?;
    let review = import::review(&rows, user, direction);
    tracing::info!(
        rows = review.rows.len(),
        issues = review.issues().len(),
        "reviewed upload"
    );
    let records = review.into_records()?;

    if !dry_run {
        db.insert_records_batch(&records)
            .context("Failed to save uploaded records")?;
    }
    Ok(Output::Upload(UploadView {
        dry_run,
        count: records.len(),
        records,
    }))
}

fn add(db: &mut Database, user: &str, args: AddArgs) -> Result<Output> {
    let mut record = TransactionRecord::new(user.to_string(), args.month);
    record.category = args.category.trim().to_string();
    record.item_name = args.item.unwrap_or_default().trim().to_string();
    record.notes = args.notes.unwrap_or_default().trim().to_string();

    match (args.amount, args.money_in, args.money_out) {
        (Some(amount), None, None) => {
            let direction = if args.income {
                Direction::MoneyIn
            } else {
                Direction::MoneyOut
            };
            record.book(amount, direction);
        }
        (amount, money_in, money_out) => {
            record.money_in = money_in.unwrap_or_default();
            record.money_out = money_out.unwrap_or_default();
            record.amount = amount.unwrap_or_else(|| record.money_in.max(record.money_out));
        }
    }

    check_entry(&record)?;
    let id = db.insert_record(&record).context("Failed to save record")?;
    record.id = Some(id);
    Ok(Output::Record(RecordView {
        message: format!("Added record {id}"),
        record,
    }))
}

fn edit(db: &mut Database, user: &str, id: i64, changes: EditArgs) -> Result<Output> {
    let mut record = db
        .get_record(user, id)?
        .ok_or_else(|| anyhow::anyhow!("Record {id} not found"))?;

    if let Some(month) = changes.month {
        record.month = month;
    }
    if let Some(category) = changes.category {
        record.category = category.trim().to_string();
    }
    if let Some(item) = changes.item {
        record.item_name = item.trim().to_string();
    }
    if let Some(notes) = changes.notes {
        record.notes = notes.trim().to_string();
    }
    let money_changed = changes.money_in.is_some() || changes.money_out.is_some();
    if let Some(money_in) = changes.money_in {
        record.money_in = money_in;
    }
    if let Some(money_out) = changes.money_out {
        record.money_out = money_out;
    }
    match changes.amount {
        Some(amount) => record.amount = amount,
        None if money_changed => record.amount = record.money_in.max(record.money_out),
        None => {}
    }
    record.updated_at = chrono::Utc::now().to_rfc3339();

    check_entry(&record)?;
    if !db.update_record(&record)? {
        anyhow::bail!("Record {id} not found");
    }
    Ok(Output::Record(RecordView {
        message: format!("Updated record {id}"),
        record,
    }))
}

fn delete(db: &mut Database, user: &str, id: i64) -> Result<Output> {
    if !db.delete_record(user, id)? {
        anyhow::bail!("Record {id} not found");
    }
    Ok(Output::Deleted(DeletedView {
        id,
        message: format!("Deleted record {id}"),
    }))
}

fn check_entry(record: &TransactionRecord) -> Result<()> {
    let errors = import::validate_entry(record);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(InvalidEntry(errors).into())
    }
}

fn list(db: &mut Database, user: &str, period: Period) -> Result<Output> {
    let records = fetch(db, user, &period)?;
    Ok(Output::Records(RecordList {
        period: period_key(&period),
        count: records.len(),
        records,
    }))
}

fn months(db: &mut Database, user: &str) -> Result<Output> {
    let months = db.get_months(user)?;
    Ok(Output::Months(MonthList {
        count: months.len(),
        months,
    }))
}

// ── Reports ───────────────────────────────────────────────────

fn summary(db: &mut Database, user: &str, period: Period) -> Result<Output> {
    let records = fetch(db, user, &period)?;
    let key = period_key(&period);
    let scope = match period {
        Period::Month(m) => CategoryScope::Month(m),
        Period::AllTime => CategoryScope::AllTime,
    };
    Ok(Output::Summary(SummaryView {
        summary: MonthTotals::from(&summarize(&key, &records)),
        category_breakdown: aggregate_by_category(&records, &scope),
        period: key,
    }))
}

fn compare_months(db: &mut Database, user: &str, first: &str, second: &str) -> Result<Output> {
    let a = summarize(first, &db.get_records(user, Some(first))?);
    let b = summarize(second, &db.get_records(user, Some(second))?);
    Ok(Output::Comparison(ComparisonView {
        comparison: compare(&a, &b),
        month1: MonthTotals::from(&a),
        month2: MonthTotals::from(&b),
    }))
}

fn chart_monthly(db: &mut Database, user: &str, limit: usize) -> Result<Output> {
    let records = fetch(db, user, &Period::AllTime)?;
    let data: Vec<MonthTotals> = recent_months(&aggregate_by_month(&records), limit)
        .iter()
        .map(MonthTotals::from)
        .collect();
    Ok(Output::MonthlyChart(MonthlyChart {
        count: data.len(),
        data,
    }))
}

fn chart_category(db: &mut Database, user: &str, period: Period) -> Result<Output> {
    let records = fetch(db, user, &period)?;
    let key = period_key(&period);
    let scope = match period {
        Period::Month(m) => CategoryScope::Month(m),
        Period::AllTime => CategoryScope::AllTime,
    };
    let data = aggregate_by_category(&records, &scope);
    Ok(Output::CategoryChart(CategoryChart {
        period: key,
        count: data.len(),
        total_money_out: data
            .iter()
            .fold(Decimal::ZERO, |acc, c| acc.saturating_add(c.total_money_out)),
        data,
    }))
}

fn chart_trend(db: &mut Database, user: &str, limit: usize) -> Result<Output> {
    let records = fetch(db, user, &Period::AllTime)?;
    let data = build_trend(&recent_months(&aggregate_by_month(&records), limit));
    Ok(Output::Trend(TrendView {
        count: data.len(),
        data,
    }))
}

// ── Categories ────────────────────────────────────────────────

fn categories(db: &mut Database, user: &str) -> Result<Output> {
    let categories = db.get_categories(user)?;
    Ok(Output::Categories(CategoryList {
        count: categories.len(),
        categories,
    }))
}

fn add_category(db: &mut Database, user: &str, name: &str) -> Result<Output> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InvalidEntry(vec![ValidationError::MissingCategory]).into());
    }
    let created = db.insert_category(user, name)?;
    Ok(Output::CategorySaved(CategorySaved {
        name: name.to_string(),
        created,
    }))
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
