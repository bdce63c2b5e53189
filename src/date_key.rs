use chrono::{DateTime, Local, NaiveDate};

/// Canonical calendar-day key for a local instant. Fixed-width `YYYY-MM-DD`,
/// so lexicographic order on keys equals chronological order.
pub fn day_key(instant: DateTime<Local>) -> String {
    instant.date_naive().format("%Y-%m-%d").to_string()
}

pub fn key_for_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Reconstructs the local calendar date a key was produced from.
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Inclusive membership: `start <= key <= end` under string comparison.
/// An inverted range (`start > end`) contains nothing.
pub fn in_range(key: &str, start: &str, end: &str) -> bool {
    start <= key && key <= end
}
