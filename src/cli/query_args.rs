//! Free-text filters for the duration query
//!
//! `дата 25.12.2024 тип ГМ тк 12345`, in any order and any case.

use regex::Regex;

use crate::core::dates;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::QueryFilter;

pub struct QueryArgParser {
    date: Regex,
    any_date: Regex,
    outlet_type: Regex,
    outlet_number: Regex,
}

impl QueryArgParser {
    pub fn new() -> SheetmarkResult<Self> {
        Ok(Self {
            date: compile(r"(?i)дата\s+(\d{1,2}[./-]\d{1,2}[./-]\d{4})")?,
            any_date: compile(r"(?i)дата\s+(\S+)")?,
            outlet_type: compile(r"(?i)тип\s+(ГМ\+СМ|ГМ|СМ|Частично\s*ГМ|Частично\s*СМ)")?,
            outlet_number: compile(r"(?i)тк\s+(\d+)")?,
        })
    }

    /// Build a filter from the text after the command.
    ///
    /// At least one filter must be recognised. A `дата` argument that is not
    /// a real calendar date is rejected rather than silently ignored.
    pub fn parse(&self, args: &str) -> SheetmarkResult<QueryFilter> {
        let date_text = capture(&self.date, args);
        let filter = QueryFilter {
            date: match &date_text {
                Some(text) => Some(dates::parse(text).ok_or_else(|| bad_date(text))?),
                None => None,
            },
            outlet_type: capture(&self.outlet_type, args),
            outlet_number: capture(&self.outlet_number, args),
        };

        if filter.is_empty() {
            if let Some(text) = capture(&self.any_date, args) {
                return Err(bad_date(&text));
            }
            return Err(SheetmarkError::InvalidInput(
                "No filters recognised; use дата ДД.ММ.ГГГГ, тип ГМ or тк 12345".to_string(),
            ));
        }
        Ok(filter)
    }
}

/// One line per active filter, as shown above query results
pub fn describe(filter: &QueryFilter) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(date) = filter.date {
        lines.push(format!("Дата: {}", dates::format(date)));
    }
    if let Some(kind) = &filter.outlet_type {
        lines.push(format!("Тип ТК: {}", kind));
    }
    if let Some(number) = &filter.outlet_number {
        lines.push(format!("Номер ТК: {}", number));
    }
    lines
}

fn compile(pattern: &str) -> SheetmarkResult<Regex> {
    Regex::new(pattern).map_err(|e| SheetmarkError::InvalidInput(format!("Bad pattern: {}", e)))
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn bad_date(text: &str) -> SheetmarkError {
    SheetmarkError::InvalidInput(format!(
        "Bad date format: \"{}\" (expected ДД.ММ.ГГГГ)",
        text
    ))
}
