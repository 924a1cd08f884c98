use calamine::{open_workbook_auto, Data, Reader};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

use crate::error::ImportError;
use crate::month::is_canonical_month;

use super::{Cell, Row};

/// Load the rows of a spreadsheet, CSV or JSON upload. The first row of a
/// sheet or CSV supplies the keys for every following row.
pub(crate) fn read_rows(path: &Path) -> Result<Vec<Row>, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        "csv" => read_csv(std::fs::File::open(path)?)?,
        "json" => read_json(&std::fs::read_to_string(path)?)?,
        _ => return Err(ImportError::UnsupportedFormat(ext)),
    };

    if rows.iter().all(Row::is_blank) {
        return Err(ImportError::Empty(path.display().to_string()));
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "read upload rows");
    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Row>, ImportError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::NoWorksheet(path.display().to_string()))??;

    let mut lines = range.rows();
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers = header_names(header.iter().map(|d| data_cell(d).to_text()));

    Ok(lines
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), cells.get(i).map(data_cell).unwrap_or(Cell::Empty)))
                .collect()
        })
        .collect())
}

pub(crate) fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<Row>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = header_names(
        rdr.headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string()),
    );

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row = Row::new();
        for (i, h) in headers.iter().enumerate() {
            let cell = match record.get(i) {
                Some(v) if !v.is_empty() => Cell::text(v),
                _ => Cell::Empty,
            };
            row.push(h.as_str(), cell);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Accepts `[{...}, ...]` or `{"expenses": [{...}, ...]}`.
pub(crate) fn read_json(text: &str) -> Result<Vec<Row>, ImportError> {
    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        Value::Object(mut body) => match body.remove("expenses") {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::JsonShape),
        },
        _ => return Err(ImportError::JsonShape),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(k, v)| (k, json_cell(v)))
                .collect()),
            _ => Err(ImportError::JsonShape),
        })
        .collect()
}

fn header_names(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.enumerate()
        .map(|(i, h)| {
            if h.trim().is_empty() {
                format!("Column {}", i + 1)
            } else {
                h
            }
        })
        .collect()
}

fn data_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f).map_or(Cell::Empty, Cell::Number),
        Data::String(s) => Cell::text(s.as_str()),
        Data::Bool(b) => Cell::text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Cell::Empty, |d| Cell::text(d.format("%Y-%m").to_string())),
        Data::DateTimeIso(s) => match s.get(..7) {
            Some(prefix) if is_canonical_month(prefix) => Cell::text(prefix),
            _ => Cell::text(s.as_str()),
        },
        Data::DurationIso(s) => Cell::text(s.as_str()),
    }
}

fn json_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::String(s) => Cell::Text(s),
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_or(Cell::Empty, Cell::Number),
        Value::Bool(b) => Cell::text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
#[path = "sheet_tests.rs"]
mod tests;
