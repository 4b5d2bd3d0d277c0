//! Date parsing for sheet cells and query arguments
//!
//! Accepted: `D.M.YYYY` and `YYYY.M.D` with any of `.`, `-`, `/` as separators,
//! then a handful of verbose formats. Unparseable text is "no date", never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const SEPARATORS: [char; 3] = ['.', '-', '/'];

const FALLBACK_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

const FALLBACK_DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
];

fn is_digits(part: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

fn numeric_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split(SEPARATORS).collect();
    if parts.len() != 3 {
        return None;
    }

    // Day first
    if is_digits(parts[0], 1, 2) && is_digits(parts[1], 1, 2) && is_digits(parts[2], 4, 4) {
        let day = parts[0].parse().ok()?;
        let month = parts[1].parse().ok()?;
        let year = parts[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    // Year first
    if is_digits(parts[0], 4, 4) && is_digits(parts[1], 1, 2) && is_digits(parts[2], 1, 2) {
        let year = parts[0].parse().ok()?;
        let month = parts[1].parse().ok()?;
        let day = parts[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn fallback_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Parse a date cell or argument
pub fn parse(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    numeric_date(trimmed).or_else(|| fallback_date(trimmed))
}

/// Render as `DD.MM.YYYY`
pub fn format(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Display form of a cell: `DD.MM.YYYY` when it parses, otherwise the text as-is
pub fn format_text(text: &str) -> String {
    match parse(text) {
        Some(date) => format(date),
        None => text.to_string(),
    }
}

/// Inclusive range check; a missing bound is unbounded on that side
pub fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    match (start, end) {
        (Some(s), Some(e)) => date >= s && date <= e,
        (Some(s), None) => date >= s,
        (None, Some(e)) => date <= e,
        (None, None) => true,
    }
}
