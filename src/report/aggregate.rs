use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::TransactionRecord;

/// Totals for one month. Never persisted; rebuilt from records on every read.
/// Sums saturate at the `Decimal` bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonthlyAggregate {
    pub(crate) month: String,
    pub(crate) total_money_in: Decimal,
    pub(crate) total_money_out: Decimal,
    /// Number of records in the month.
    pub(crate) total_expenses: usize,
    /// Records with a strictly positive money in.
    pub(crate) money_in_count: usize,
    /// Records with a strictly positive money out.
    pub(crate) money_out_count: usize,
}

impl MonthlyAggregate {
    pub(crate) fn new(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            ..Self::default()
        }
    }

    pub(crate) fn remaining(&self) -> Decimal {
        self.total_money_in.saturating_sub(self.total_money_out)
    }

    fn add(&mut self, record: &TransactionRecord) {
        self.total_money_in = self.total_money_in.saturating_add(record.money_in);
        self.total_money_out = self.total_money_out.saturating_add(record.money_out);
        self.total_expenses += 1;
        if record.money_in > Decimal::ZERO {
            self.money_in_count += 1;
        }
        if record.money_out > Decimal::ZERO {
            self.money_out_count += 1;
        }
    }
}

/// Per-category totals within a scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoryAggregate {
    pub(crate) category: String,
    pub(crate) total_amount: Decimal,
    pub(crate) total_money_in: Decimal,
    pub(crate) total_money_out: Decimal,
    pub(crate) count: usize,
    /// Share of the scope's total money out, 0 when that total is 0.
    pub(crate) percentage: Decimal,
}

impl CategoryAggregate {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            total_amount: Decimal::ZERO,
            total_money_in: Decimal::ZERO,
            total_money_out: Decimal::ZERO,
            count: 0,
            percentage: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CategoryScope {
    Month(String),
    AllTime,
}

impl CategoryScope {
    fn includes(&self, record: &TransactionRecord) -> bool {
        match self {
            Self::Month(m) => record.month == *m,
            Self::AllTime => true,
        }
    }
}

/// Group records on their exact month key. Iteration is ascending by month.
pub(crate) fn aggregate_by_month(records: &[TransactionRecord]) -> BTreeMap<String, MonthlyAggregate> {
    records.iter().fold(BTreeMap::new(), |mut acc, record| {
        acc.entry(record.month.clone())
            .or_insert_with(|| MonthlyAggregate::new(record.month.as_str()))
            .add(record);
        acc
    })
}

/// Group the in-scope records by category, largest money out first. Ties keep
/// the order in which each category was first seen.
pub(crate) fn aggregate_by_category(
    records: &[TransactionRecord],
    scope: &CategoryScope,
) -> Vec<CategoryAggregate> {
    let mut groups: Vec<CategoryAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| scope.includes(r)) {
        let label = record.category_label();
        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(CategoryAggregate::new(label));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total_amount = group.total_amount.saturating_add(record.amount);
        group.total_money_in = group.total_money_in.saturating_add(record.money_in);
        group.total_money_out = group.total_money_out.saturating_add(record.money_out);
        group.count += 1;
    }

    groups.sort_by(|a, b| b.total_money_out.cmp(&a.total_money_out));

    let total = groups
        .iter()
        .fold(Decimal::ZERO, |acc, g| acc.saturating_add(g.total_money_out));
    if !total.is_zero() {
        for group in &mut groups {
            group.percentage = group
                .total_money_out
                .checked_div(total)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ZERO);
        }
    }
    groups
}

/// The `limit` most recent months, oldest first.
pub(crate) fn recent_months(
    months: &BTreeMap<String, MonthlyAggregate>,
    limit: usize,
) -> Vec<MonthlyAggregate> {
    let skip = months.len().saturating_sub(limit);
    months.values().skip(skip).cloned().collect()
}

/// One aggregate over an arbitrary record set, labelled `month`.
pub(crate) fn summarize(month: &str, records: &[TransactionRecord]) -> MonthlyAggregate {
    records
        .iter()
        .fold(MonthlyAggregate::new(month), |mut acc, record| {
            acc.add(record);
            acc
        })
}
