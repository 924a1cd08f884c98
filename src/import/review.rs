use rust_decimal::Decimal;

use crate::error::{ImportError, RowIssue, ValidationError};
use crate::models::{Direction, TransactionRecord};
use crate::month::is_canonical_month;

use super::{extract, Row};

/// Largest amount a record may carry: 10^15.
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// An extracted row plus everything wrong with it.
#[derive(Debug, Clone)]
pub(crate) struct ReviewedRow {
    /// 1-based data row number (header excluded).
    pub(crate) line: usize,
    pub(crate) record: TransactionRecord,
    pub(crate) errors: Vec<ValidationError>,
}

impl ReviewedRow {
    pub(crate) fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The outcome of checking a whole upload before anything is written.
#[derive(Debug, Clone, Default)]
pub(crate) struct Review {
    pub(crate) rows: Vec<ReviewedRow>,
}

impl Review {
    pub(crate) fn issues(&self) -> Vec<RowIssue> {
        self.rows
            .iter()
            .filter(|r| !r.is_valid())
            .map(|r| RowIssue {
                line: r.line,
                errors: r.errors.clone(),
            })
            .collect()
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.rows.iter().all(ReviewedRow::is_valid)
    }

    /// All records, or a rejection listing every bad row. Never a partial batch.
    pub(crate) fn into_records(self) -> Result<Vec<TransactionRecord>, ImportError> {
        if !self.is_clean() {
            return Err(ImportError::Rejected {
                total: self.rows.len(),
                issues: self.issues(),
            });
        }
        Ok(self.rows.into_iter().map(|r| r.record).collect())
    }
}

/// Extract and validate every non-blank row.
pub(crate) fn review(rows: &[Row], user_id: &str, direction: Direction) -> Review {
    let rows = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.is_blank())
        .map(|(i, row)| {
            let extracted = extract(row, user_id, direction);
            let errors = validate_import(&extracted.record, &extracted.raw_month);
            ReviewedRow {
                line: i + 1,
                record: extracted.record,
                errors,
            }
        })
        .collect();
    Review { rows }
}

/// Uploaded rows need a month, an item name and an amount in `(0, MAX_AMOUNT]`.
fn validate_import(record: &TransactionRecord, raw_month: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !is_canonical_month(&record.month) {
        errors.push(ValidationError::InvalidMonth(raw_month.trim().to_string()));
    }
    if record.item_name.trim().is_empty() {
        errors.push(ValidationError::MissingItemName);
    }
    if record.amount <= Decimal::ZERO {
        errors.push(ValidationError::NonPositiveAmount);
    } else if record.amount > MAX_AMOUNT {
        errors.push(ValidationError::TooLarge("Amount"));
    }
    errors
}

/// Manual entries need a month and a category; money fields must lie in
/// `0..=MAX_AMOUNT`.
pub(crate) fn validate_entry(record: &TransactionRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if !is_canonical_month(&record.month) {
        errors.push(ValidationError::InvalidMonth(record.month.clone()));
    }
    if record.category.trim().is_empty() {
        errors.push(ValidationError::MissingCategory);
    }
    for (label, value) in [
        ("Amount", record.amount),
        ("Money in", record.money_in),
        ("Money out", record.money_out),
    ] {
        if value < Decimal::ZERO {
            errors.push(ValidationError::Negative(label));
        } else if value > MAX_AMOUNT {
            errors.push(ValidationError::TooLarge(label));
        }
    }
    errors
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
