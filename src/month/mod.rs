use chrono::Datelike;
use regex::Regex;
use std::sync::LazyLock;

/// Full names first, then three-letter abbreviations. Scan order decides ties.
const MONTH_TOKENS: [&str; 24] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug",
    "sep", "oct", "nov", "dec",
];

const DISPLAY_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static CANONICAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").ok());
static YEAR: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[0-9]{4}").ok());

/// True when `s` is exactly a `YYYY-MM` key.
pub(crate) fn is_canonical_month(s: &str) -> bool {
    CANONICAL.as_ref().is_some_and(|re| re.is_match(s))
}

/// Parse "June 2025", "jun2025", "2025-06" and friends into `YYYY-MM`.
/// A missing year falls back to the current calendar year.
pub(crate) fn normalize_month(input: &str) -> Option<String> {
    normalize_month_with_year(input, chrono::Local::now().year())
}

pub(crate) fn normalize_month_with_year(input: &str, default_year: i32) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_canonical_month(trimmed) {
        return Some(trimmed.to_string());
    }

    let clean = trimmed.to_lowercase();
    let year = YEAR
        .as_ref()
        .and_then(|re| re.find(&clean))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| format!("{default_year:04}"));

    MONTH_TOKENS
        .iter()
        .position(|token| clean.contains(token))
        .map(|i| format!("{year}-{:02}", i % 12 + 1))
}

/// `2025-06` -> `June 2025`. Anything already containing letters is returned as-is.
pub(crate) fn format_month_for_display(month: &str) -> String {
    if month.chars().any(|c| c.is_ascii_alphabetic()) {
        return month.to_string();
    }
    let Some(caps) = CANONICAL.as_ref().and_then(|re| re.captures(month)) else {
        return month.to_string();
    };
    let index = caps[2].parse::<usize>().unwrap_or(0);
    match index.checked_sub(1).and_then(|i| DISPLAY_NAMES.get(i)) {
        Some(name) => format!("{name} {}", &caps[1]),
        None => month.to_string(),
    }
}

pub(crate) fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests;
