use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::models::TransactionRecord;
use crate::month::format_month_for_display;
use crate::report::{
    CategoryAggregate, ComparisonResult, MetricDelta, MonthlyAggregate, TrendPoint,
};

use super::cli::Period;

/// Everything a command can print. JSON output is the inner view as-is.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Output {
    Upload(UploadView),
    Record(RecordView),
    Records(RecordList),
    Months(MonthList),
    Deleted(DeletedView),
    Summary(SummaryView),
    Comparison(ComparisonView),
    MonthlyChart(MonthlyChart),
    CategoryChart(CategoryChart),
    Trend(TrendView),
    Categories(CategoryList),
    CategorySaved(CategorySaved),
}

/// Month totals with the derived remaining balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonthTotals {
    pub(crate) month: String,
    pub(crate) total_money_in: Decimal,
    pub(crate) total_money_out: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) total_expenses: usize,
}

impl From<&MonthlyAggregate> for MonthTotals {
    fn from(agg: &MonthlyAggregate) -> Self {
        Self {
            month: agg.month.clone(),
            total_money_in: agg.total_money_in,
            total_money_out: agg.total_money_out,
            remaining: agg.remaining(),
            total_expenses: agg.total_expenses,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadView {
    pub(crate) dry_run: bool,
    pub(crate) count: usize,
    pub(crate) records: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordView {
    pub(crate) message: String,
    pub(crate) record: TransactionRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordList {
    pub(crate) period: String,
    pub(crate) count: usize,
    pub(crate) records: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonthList {
    pub(crate) count: usize,
    pub(crate) months: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeletedView {
    pub(crate) id: i64,
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummaryView {
    pub(crate) period: String,
    pub(crate) summary: MonthTotals,
    pub(crate) category_breakdown: Vec<CategoryAggregate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ComparisonView {
    pub(crate) comparison: ComparisonResult,
    pub(crate) month1: MonthTotals,
    pub(crate) month2: MonthTotals,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonthlyChart {
    pub(crate) count: usize,
    pub(crate) data: Vec<MonthTotals>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryChart {
    pub(crate) period: String,
    pub(crate) count: usize,
    pub(crate) total_money_out: Decimal,
    pub(crate) data: Vec<CategoryAggregate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TrendView {
    pub(crate) count: usize,
    pub(crate) data: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryList {
    pub(crate) count: usize,
    pub(crate) categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategorySaved {
    pub(crate) name: String,
    pub(crate) created: bool,
}

/// `2025-06` or `all`, as used in JSON output.
pub(crate) fn period_key(period: &Period) -> String {
    match period {
        Period::Month(m) => m.clone(),
        Period::AllTime => "all".into(),
    }
}

fn period_label(key: &str) -> String {
    if key == "all" {
        "All time".into()
    } else {
        format_month_for_display(key)
    }
}

/// Signed percentage, or "n/a" when there is nothing to compare against.
pub(crate) fn percent(delta: &MetricDelta) -> String {
    if !delta.has_baseline {
        return "n/a".into();
    }
    signed_percent(delta.percentage_change)
}

fn signed_percent(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

fn rule(f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
    writeln!(f, "{}", "─".repeat(width))
}

fn write_records(f: &mut fmt::Formatter<'_>, records: &[TransactionRecord]) -> fmt::Result {
    writeln!(
        f,
        "{:<6} {:<8} {:<22} {:<18} {:>12} {:>12}",
        "ID", "Month", "Item", "Category", "Money in", "Money out"
    )?;
    rule(f, 83)?;
    for r in records {
        writeln!(
            f,
            "{:<6} {:<8} {:<22} {:<18} {:>12.2} {:>12.2}",
            r.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            r.month,
            truncate(&r.item_name, 22),
            truncate(r.category_label(), 18),
            r.money_in,
            r.money_out,
        )?;
    }
    Ok(())
}

fn write_totals(f: &mut fmt::Formatter<'_>, totals: &MonthTotals) -> fmt::Result {
    writeln!(f, "  Money in:   {:.2}", totals.total_money_in)?;
    writeln!(f, "  Money out:  {:.2}", totals.total_money_out)?;
    writeln!(f, "  Remaining:  {:.2}", totals.remaining)?;
    writeln!(f, "  Records:    {}", totals.total_expenses)
}

fn write_categories(f: &mut fmt::Formatter<'_>, categories: &[CategoryAggregate]) -> fmt::Result {
    for c in categories {
        writeln!(
            f,
            "  {:<24} {:>12.2} {:>7.1}%  ({} record{})",
            truncate(&c.category, 24),
            c.total_money_out,
            c.percentage,
            c.count,
            if c.count == 1 { "" } else { "s" },
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload(v) => write!(f, "{v}"),
            Self::Record(v) => write!(f, "{v}"),
            Self::Records(v) => write!(f, "{v}"),
            Self::Months(v) => {
                if v.months.is_empty() {
                    return writeln!(f, "No records yet");
                }
                for m in &v.months {
                    writeln!(f, "{m:<8} {}", format_month_for_display(m))?;
                }
                Ok(())
            }
            Self::Deleted(v) => writeln!(f, "{}", v.message),
            Self::Summary(v) => write!(f, "{v}"),
            Self::Comparison(v) => write!(f, "{v}"),
            Self::MonthlyChart(v) => write!(f, "{v}"),
            Self::CategoryChart(v) => write!(f, "{v}"),
            Self::Trend(v) => write!(f, "{v}"),
            Self::Categories(v) => write!(f, "{v}"),
            Self::CategorySaved(v) => {
                if v.created {
                    writeln!(f, "Saved category '{}'", v.name)
                } else {
                    writeln!(f, "Category '{}' already saved", v.name)
                }
            }
        }
    }
}

impl fmt::Display for UploadView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            writeln!(f, "Dry run: {} record(s) would be saved", self.count)?;
        } else {
            writeln!(f, "{} record(s) uploaded successfully", self.count)?;
        }
        writeln!(f)?;
        write_records(f, &self.records)
    }
}

impl fmt::Display for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        writeln!(f)?;
        write_records(f, std::slice::from_ref(&self.record))
    }
}

impl fmt::Display for RecordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            return writeln!(f, "No records for {}", period_label(&self.period));
        }
        writeln!(f, "{} ({} records)", period_label(&self.period), self.count)?;
        write_records(f, &self.records)
    }
}

impl fmt::Display for SummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spendo — {}", period_label(&self.period))?;
        rule(f, 40)?;
        write_totals(f, &self.summary)?;
        if !self.category_breakdown.is_empty() {
            writeln!(f)?;
            writeln!(f, "Money out by category:")?;
            write_categories(f, &self.category_breakdown)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComparisonView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = format_month_for_display(&self.month1.month);
        let b = format_month_for_display(&self.month2.month);
        writeln!(f, "{:<12} {:>14} {:>14} {:>14} {:>9}", "", a, b, "Difference", "Change")?;
        rule(f, 67)?;
        for (label, delta) in [
            ("Money in", &self.comparison.money_in),
            ("Money out", &self.comparison.money_out),
            ("Remaining", &self.comparison.remaining),
        ] {
            writeln!(
                f,
                "{:<12} {:>14.2} {:>14.2} {:>14.2} {:>9}",
                label,
                delta.value_a,
                delta.value_b,
                delta.difference,
                percent(delta),
            )?;
        }
        writeln!(
            f,
            "{:<12} {:>14} {:>14}",
            "Records", self.month1.total_expenses, self.month2.total_expenses
        )
    }
}

impl fmt::Display for MonthlyChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            return writeln!(f, "No records yet");
        }
        writeln!(
            f,
            "{:<16} {:>12} {:>12} {:>12} {:>8}",
            "Month", "Money in", "Money out", "Remaining", "Records"
        )?;
        rule(f, 64)?;
        for m in &self.data {
            writeln!(
                f,
                "{:<16} {:>12.2} {:>12.2} {:>12.2} {:>8}",
                format_month_for_display(&m.month),
                m.total_money_in,
                m.total_money_out,
                m.remaining,
                m.total_expenses,
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for CategoryChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} — money out {:.2}",
            period_label(&self.period),
            self.total_money_out
        )?;
        rule(f, 40)?;
        if self.data.is_empty() {
            return writeln!(f, "  (no records)");
        }
        write_categories(f, &self.data)
    }
}

impl fmt::Display for TrendView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            return writeln!(f, "No records yet");
        }
        writeln!(
            f,
            "{:<16} {:>12} {:>9} {:>12} {:>9} {:>12} {:>9}",
            "Month", "Money in", "Growth", "Money out", "Growth", "Remaining", "Growth"
        )?;
        rule(f, 85)?;
        for (i, p) in self.data.iter().enumerate() {
            let growth = |g: Decimal| {
                if i == 0 {
                    "-".to_string()
                } else {
                    signed_percent(g)
                }
            };
            writeln!(
                f,
                "{:<16} {:>12.2} {:>9} {:>12.2} {:>9} {:>12.2} {:>9}",
                format_month_for_display(&p.month),
                p.total_money_in,
                growth(p.money_in_growth),
                p.total_money_out,
                growth(p.money_out_growth),
                p.remaining,
                growth(p.remaining_growth),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for CategoryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.categories.is_empty() {
            return writeln!(f, "No categories");
        }
        for name in &self.categories {
            writeln!(f, "{name}")?;
        }
        Ok(())
    }
}
