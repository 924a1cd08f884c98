mod extract;
mod review;
mod sheet;

use rust_decimal::Decimal;

pub(crate) use extract::extract;
pub(crate) use review::{review, validate_entry};
pub(crate) use sheet::read_rows;

/// One spreadsheet cell as the extractor sees it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Number(Decimal),
    Text(String),
}

impl Cell {
    pub(crate) fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    pub(crate) fn is_zero_number(&self) -> bool {
        matches!(self, Self::Number(n) if n.is_zero())
    }

    pub(crate) fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.normalize().to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Header -> value pairs in source column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Row {
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: impl Into<String>, value: Cell) {
        self.cells.push((key.into(), value));
    }

    #[cfg(test)]
    pub(crate) fn with(mut self, key: impl Into<String>, value: Cell) -> Self {
        self.push(key, value);
        self
    }

    /// Exact, case-sensitive lookup. First column wins on duplicate headers.
    pub(crate) fn get(&self, key: &str) -> Option<&Cell> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }
}

impl FromIterator<(String, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
