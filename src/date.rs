//! Date normalization for the ranking report arguments.

use chrono::NaiveDate;

/// Date formats accepted from callers, tried in order. `%B` matches the
/// full month name and also accepts the abbreviation when parsing.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%d %B %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Normalize a human-entered date to the `YYYY-MM-DD` form the service
/// expects.
///
/// Accepts ISO dates, `Jan 1, 2011` / `January 1, 2011`, `1 Feb 2011`,
/// `01/15/2011`, `2011/01/15`, and RFC 3339 timestamps (the calendar
/// date is kept, the time dropped). Returns `None` when the input does
/// not parse as any of those, including calendar-invalid dates.
pub fn normalize(value: &str) -> Option<String> {
    let value = value.trim();
    for format in INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(stamp.date_naive().format("%Y-%m-%d").to_string());
    }
    None
}
