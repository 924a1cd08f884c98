#![allow(clippy::unwrap_used)]

use super::*;

// ── normalize_month ───────────────────────────────────────────

#[test]
fn test_canonical_months_are_unchanged() {
    for m in ["2025-06", "1999-12", "2024-01", "0001-01"] {
        assert_eq!(normalize_month(m).as_deref(), Some(m));
    }
}

#[test]
fn test_canonical_month_is_trimmed() {
    assert_eq!(normalize_month("  2025-06 ").as_deref(), Some("2025-06"));
}

#[test]
fn test_full_month_name_with_year() {
    assert_eq!(normalize_month("June 2025").as_deref(), Some("2025-06"));
    assert_eq!(normalize_month("DECEMBER 2023").as_deref(), Some("2023-12"));
}

#[test]
fn test_abbreviation_without_space() {
    assert_eq!(normalize_month("jun2025").as_deref(), Some("2025-06"));
    assert_eq!(normalize_month("Sep-2024").as_deref(), Some("2024-09"));
}

#[test]
fn test_may_resolves_from_either_list_entry() {
    assert_eq!(normalize_month("May 2022").as_deref(), Some("2022-05"));
}

#[test]
fn test_full_name_wins_over_earlier_abbreviation() {
    // "march" appears before "mar" in scan order
    assert_eq!(normalize_month("march 2021").as_deref(), Some("2021-03"));
}

#[test]
fn test_missing_year_uses_default() {
    assert_eq!(
        normalize_month_with_year("August", 2030).as_deref(),
        Some("2030-08")
    );
}

#[test]
fn test_missing_year_uses_current_year() {
    let year = chrono::Local::now().year();
    assert_eq!(normalize_month("feb"), Some(format!("{year}-02")));
}

#[test]
fn test_first_four_digit_run_is_the_year() {
    assert_eq!(
        normalize_month("Salary 2019 paid Jan 2020").as_deref(),
        Some("2019-01")
    );
}

#[test]
fn test_unrecognized_month() {
    assert!(normalize_month("not a month").is_none());
    assert!(normalize_month("2025").is_none());
    assert!(normalize_month("").is_none());
    assert!(normalize_month("   ").is_none());
}

#[test]
fn test_iso_date_is_not_a_month() {
    assert!(normalize_month("2025-06-15").is_none());
}

// ── format_month_for_display ──────────────────────────────────

#[test]
fn test_format_canonical() {
    assert_eq!(format_month_for_display("2025-06"), "June 2025");
    assert_eq!(format_month_for_display("2024-01"), "January 2024");
    assert_eq!(format_month_for_display("2024-12"), "December 2024");
}

#[test]
fn test_format_is_idempotent() {
    assert_eq!(format_month_for_display("June 2025"), "June 2025");
    let once = format_month_for_display("2023-03");
    assert_eq!(format_month_for_display(&once), once);
}

#[test]
fn test_format_out_of_range_month_passes_through() {
    assert_eq!(format_month_for_display("2025-13"), "2025-13");
    assert_eq!(format_month_for_display("2025-00"), "2025-00");
}

#[test]
fn test_format_empty_and_garbage() {
    assert_eq!(format_month_for_display(""), "");
    assert_eq!(format_month_for_display("123"), "123");
}

// ── helpers ───────────────────────────────────────────────────

#[test]
fn test_is_canonical_month() {
    assert!(is_canonical_month("2025-06"));
    assert!(!is_canonical_month("2025-6"));
    assert!(!is_canonical_month(" 2025-06"));
    assert!(!is_canonical_month("June 2025"));
}

#[test]
fn test_current_month_is_canonical() {
    assert!(is_canonical_month(&current_month()));
}
