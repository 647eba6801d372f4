//! Field normalizers
//!
//! Parse raw cell text into typed values. All functions take already-trimmed,
//! non-empty input and return `None` for anything unparseable; the row
//! validator turns `None` into a row-scoped error message. Nothing here ever
//! panics or returns `Err` for bad data.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static ISO_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}$").unwrap());
static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").unwrap());

/// Parse a date in any accepted input format.
///
/// Accepted: `YYYY-MM-DD`, `M/D/YYYY`, `MM/DD/YYYY`, `M/D/YY`, `MM/DD/YY`
/// (two-digit years map to 2000+YY), and a `YYYY-MM-DD HH:MM:SS` timestamp
/// truncated to its date part. Shapes that match but name an impossible
/// calendar date (e.g. `2/30/2024`) are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if ISO_DATE.is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }
    if ISO_TIMESTAMP.is_match(raw) {
        return NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d").ok();
    }
    if let Some(caps) = SLASH_DATE.captures(raw) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        // chrono's %y pivots two-digit years at 1969; the import format
        // defines them as 2000+YY, so the mapping is done by hand.
        if year < 100 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    None
}

/// Parse a dollar amount, tolerating `$` and thousands separators.
pub fn parse_currency(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Parse a non-negative integer (used for age).
pub fn parse_non_negative_int(raw: &str) -> Option<i64> {
    match i64::from_str(raw) {
        Ok(n) if n >= 0 => Some(n),
        _ => None,
    }
}
