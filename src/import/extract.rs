use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{Direction, TransactionRecord};
use crate::month::normalize_month;

use super::{Cell, Row};

const MONTH_KEYS: &[&str] = &["Month", "month", "MONTH", "Date", "date", "DATE"];

const ITEM_NAME_KEYS: &[&str] = &[
    "Name",
    "name",
    "NAME",
    "Item Name",
    "item name",
    "ItemName",
    "itemName",
    "Item",
    "item",
    "ITEM",
    "Description",
    "description",
];

const CATEGORY_KEYS: &[&str] = &["Category", "category", "CATEGORY", "Cat", "cat", "CAT"];

const AMOUNT_KEYS: &[&str] = &[
    "Amount (₹)",
    "Amount(₹)",
    "Amount (Rs)",
    "Amount(Rs)",
    "Amount (INR)",
    "Amount(INR)",
    "Amount",
    "amount",
    "AMOUNT",
    "AMOUNT (₹)",
    "AMOUNT(₹)",
    "Price",
    "price",
    "PRICE",
    "Cost",
    "cost",
    "COST",
    "Value",
    "value",
    "VALUE",
];

const NOTES_KEYS: &[&str] = &["Notes", "notes", "Note", "note", "Description", "description"];

const MONEY_IN_KEYS: &[&str] = &["moneyIn", "MoneyIn", "Money In"];
const MONEY_OUT_KEYS: &[&str] = &["moneyOut", "MoneyOut", "Money Out"];

/// Substrings that mark a header as money-valued when no amount candidate hit.
const AMOUNT_MARKERS: &[&str] = &["amount", "price", "cost", "value", "₹", "rs", "inr", "$"];

/// A row after header resolution, keeping the raw month for error messages.
#[derive(Debug, Clone)]
pub(crate) struct Extracted {
    pub(crate) record: TransactionRecord,
    pub(crate) raw_month: String,
}

/// Map one loosely-typed row onto a record. The month is left empty when it
/// cannot be normalized; callers validate before persisting.
pub(crate) fn extract(row: &Row, user_id: &str, direction: Direction) -> Extracted {
    let raw_month = resolve(row, MONTH_KEYS).map(Cell::to_text).unwrap_or_default();
    let month = normalize_month(&raw_month).unwrap_or_default();

    let mut record = TransactionRecord::new(user_id.to_string(), month);
    record.item_name = text_field(row, ITEM_NAME_KEYS);
    record.category = text_field(row, CATEGORY_KEYS);
    record.notes = text_field(row, NOTES_KEYS);

    let amount = resolve_amount(row).map(coerce_amount).unwrap_or_default();
    let money_in = resolve(row, MONEY_IN_KEYS).map(coerce_amount);
    let money_out = resolve(row, MONEY_OUT_KEYS).map(coerce_amount);

    if money_in.is_none() && money_out.is_none() {
        record.book(amount, direction);
    } else {
        record.money_in = money_in.unwrap_or_default();
        record.money_out = money_out.unwrap_or_default();
        record.amount = if amount.is_zero() {
            record.money_in.max(record.money_out)
        } else {
            amount
        };
    }

    Extracted { record, raw_month }
}

fn text_field(row: &Row, candidates: &[&str]) -> String {
    resolve(row, candidates)
        .map(|c| c.to_text().trim().to_string())
        .unwrap_or_default()
}

/// Find the first non-blank value for any of `candidates`.
///
/// Three passes over the candidate list: exact key, case-insensitive key,
/// then case-insensitive containment in either direction.
pub(crate) fn resolve<'a>(row: &'a Row, candidates: &[&str]) -> Option<&'a Cell> {
    for candidate in candidates {
        if let Some(cell) = row.get(candidate).filter(|c| !c.is_blank()) {
            return Some(cell);
        }
    }

    let lowered: Vec<(String, &Cell)> = row
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v))
        .collect();

    for candidate in candidates {
        let want = candidate.trim().to_lowercase();
        if let Some((_, cell)) = lowered.iter().find(|(k, _)| *k == want) {
            if !cell.is_blank() {
                return Some(*cell);
            }
        }
    }

    for candidate in candidates {
        let want = candidate.trim().to_lowercase();
        let found = lowered
            .iter()
            .find(|(k, _)| !k.is_empty() && (k.contains(&want) || want.contains(k.as_str())));
        if let Some((_, cell)) = found {
            if !cell.is_blank() {
                return Some(*cell);
            }
        }
    }

    None
}

fn resolve_amount(row: &Row) -> Option<&Cell> {
    let by_name = resolve(row, AMOUNT_KEYS).filter(|c| !c.is_zero_number());
    if by_name.is_some() {
        return by_name;
    }
    row.iter()
        .find(|(k, _)| {
            let k = k.to_lowercase();
            AMOUNT_MARKERS.iter().any(|m| k.contains(m))
        })
        .map(|(_, v)| v)
        .filter(|c| !c.is_blank())
}

/// Lenient money parsing: magnitude only, garbage becomes zero.
pub(crate) fn coerce_amount(cell: &Cell) -> Decimal {
    match cell {
        Cell::Number(n) => n.abs(),
        Cell::Text(s) => parse_money_text(s).abs(),
        Cell::Empty => Decimal::ZERO,
    }
}

fn parse_money_text(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_decimal(&cleaned)
        .and_then(|n| Decimal::from_str(&n).ok())
        .unwrap_or(Decimal::ZERO)
}

/// Longest prefix of `s` that reads as `-?digits[.digits]`, the way a
/// spreadsheet would read "12.5-3" as 12.5.
fn leading_decimal(s: &str) -> Option<String> {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (int_part, tail) = rest.split_at(int_len);
    let frac_part = tail
        .strip_prefix('.')
        .map(|t| &t[..t.bytes().take_while(u8::is_ascii_digit).count()])
        .unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    if frac_part.is_empty() {
        Some(format!("{sign}{int_part}"))
    } else {
        Some(format!("{sign}{int_part}.{frac_part}"))
    }
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
