use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("Invalid month '{0}': expected YYYY-MM or a month name like 'June 2025'")]
    InvalidMonth(String),

    #[error("Item name is required")]
    MissingItemName,

    #[error("Category is required")]
    MissingCategory,

    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{0} must not exceed 1,000,000,000,000,000")]
    TooLarge(&'static str),
}

/// A manual entry or edit that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub(crate) struct InvalidEntry(pub(crate) Vec<ValidationError>);

/// Every problem found on one data row (1-based, header excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RowIssue {
    pub(crate) line: usize,
    pub(crate) errors: Vec<ValidationError>,
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "Row {}: {}", self.line, messages.join("; "))
    }
}

#[derive(Error, Debug)]
pub(crate) enum ImportError {
    #[error("No data rows found in {0}")]
    Empty(String),

    #[error("Unsupported file type '{0}' (expected .xlsx, .xls, .xlsm, .ods, .csv or .json)")]
    UnsupportedFormat(String),

    #[error("Workbook {0} has no worksheets")]
    NoWorksheet(String),

    #[error("JSON upload must be an array of objects or an object with an 'expenses' array")]
    JsonShape,

    #[error(
        "{} of {total} row(s) need fixing before upload; nothing was saved:\n{}",
        .issues.len(),
        .issues.iter().map(|i| format!("  {i}")).collect::<Vec<_>>().join("\n")
    )]
    Rejected { total: usize, issues: Vec<RowIssue> },

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
