//! Video duration queries over the campaign sheet
//!
//! Data rows use columns A..H: name, outlet type, duration, (two unused), start
//! date, end date, paid flag. Row 1 is the header.

use std::collections::HashSet;

use super::dates;
use crate::types::{QueryFilter, QueryResult, VideoRecord};

pub const NAME_COLUMN: usize = 0;
pub const TYPE_COLUMN: usize = 1;
pub const DURATION_COLUMN: usize = 2;
pub const START_DATE_COLUMN: usize = 5;
pub const END_DATE_COLUMN: usize = 6;
pub const PAID_COLUMN: usize = 7;
/// Last column a query reads (H)
pub const LAST_DATA_COLUMN: usize = PAID_COLUMN;
/// First data row; outlet column reads start here
pub const FIRST_DATA_ROW: usize = 2;

/// Duration in seconds from a cell like `"30"`, `"12,5"` or `"15 сек"`; 0 when absent
pub fn parse_duration(text: &str) -> f64 {
    let text = text.trim().replacen(',', ".", 1);
    let bytes = text.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Rows that carry a mark in one outlet column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutletColumn {
    /// The outlet number is not a header in the sheet
    Unresolved,
    Resolved {
        column: usize,
        /// 1-based row numbers with a non-empty, non-"0" cell
        marked_rows: HashSet<usize>,
    },
}

impl OutletColumn {
    /// Collect marked rows from a single-column read starting at `first_row`
    pub fn from_values<R: AsRef<[String]>>(column: usize, values: &[R], first_row: usize) -> Self {
        let marked_rows = values
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.as_ref()
                    .first()
                    .map(|cell| {
                        let cell = cell.trim();
                        !cell.is_empty() && cell != "0"
                    })
                    .unwrap_or(false)
            })
            .map(|(i, _)| i + first_row)
            .collect();

        OutletColumn::Resolved {
            column,
            marked_rows,
        }
    }

    pub fn is_marked(&self, row_number: usize) -> bool {
        match self {
            OutletColumn::Unresolved => false,
            OutletColumn::Resolved { marked_rows, .. } => marked_rows.contains(&row_number),
        }
    }
}

struct RawRecord<'a> {
    name: &'a str,
    outlet_type: &'a str,
    duration: f64,
    start: &'a str,
    end: &'a str,
    paid: &'a str,
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}

/// Filters and aggregates sheet rows
pub struct QueryEngine<'a> {
    filter: &'a QueryFilter,
    outlet: Option<&'a OutletColumn>,
    outlet_type: Option<String>,
}

impl<'a> QueryEngine<'a> {
    /// `outlet` must be supplied whenever the filter names an outlet number;
    /// without it the outlet filter matches nothing.
    pub fn new(filter: &'a QueryFilter, outlet: Option<&'a OutletColumn>) -> Self {
        Self {
            filter,
            outlet,
            outlet_type: filter
                .outlet_type
                .as_ref()
                .map(|t| t.trim().to_lowercase()),
        }
    }

    /// Run over every row of an `A:H` read, header row included
    pub fn run<R: AsRef<[String]>>(&self, rows: &[R]) -> QueryResult {
        let records = rows
            .iter()
            .enumerate()
            .skip(1)
            .filter_map(|(i, row)| {
                let row_number = i + 1;
                let raw = Self::extract(row.as_ref())?;
                self.matches(&raw, row_number).then(|| VideoRecord {
                    campaign_name: raw.name.to_string(),
                    outlet_type: raw.outlet_type.to_string(),
                    duration: raw.duration,
                    start_date: dates::format_text(raw.start),
                    end_date: dates::format_text(raw.end),
                    paid: raw.paid.to_string(),
                    row_number,
                })
            })
            .collect();

        QueryResult::from_records(records)
    }

    fn extract(row: &[String]) -> Option<RawRecord<'_>> {
        // Rows without a duration cell are not placements
        if row.len() <= DURATION_COLUMN {
            return None;
        }
        let raw = RawRecord {
            name: cell(row, NAME_COLUMN),
            outlet_type: cell(row, TYPE_COLUMN),
            duration: parse_duration(cell(row, DURATION_COLUMN)),
            start: cell(row, START_DATE_COLUMN),
            end: cell(row, END_DATE_COLUMN),
            paid: cell(row, PAID_COLUMN),
        };
        if raw.name.is_empty() && raw.duration == 0.0 {
            return None;
        }
        Some(raw)
    }

    fn matches(&self, raw: &RawRecord<'_>, row_number: usize) -> bool {
        if let Some(date) = self.filter.date {
            let start = dates::parse(raw.start);
            let end = dates::parse(raw.end);
            if start.is_none() && end.is_none() {
                return false;
            }
            if !dates::in_range(date, start, end) {
                return false;
            }
        }

        if let Some(wanted) = &self.outlet_type {
            let actual = raw.outlet_type.to_lowercase();
            if !(actual.contains(wanted.as_str()) || wanted.contains(actual.as_str())) {
                return false;
            }
        }

        if self.filter.outlet_number.is_some() {
            match self.outlet {
                Some(outlet) if outlet.is_marked(row_number) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Shorthand for a one-off query
pub fn run<R: AsRef<[String]>>(
    rows: &[R],
    filter: &QueryFilter,
    outlet: Option<&OutletColumn>,
) -> QueryResult {
    QueryEngine::new(filter, outlet).run(rows)
}
