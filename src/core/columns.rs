//! Column letter arithmetic and A1 range strings
//!
//! Columns are bijective base-26 numerals: A=1 … Z=26, AA=27. Everything
//! outside this module works with zero-based indices.

use crate::error::{SheetmarkError, SheetmarkResult};
use std::fmt;

/// First outlet column of the sheet
pub const OUTLET_START_COLUMN: &str = "R";
/// Last outlet column of the sheet (inclusive)
pub const OUTLET_END_COLUMN: &str = "GN";

const fn decode(letters: &[u8]) -> usize {
    let mut index = 0;
    let mut i = 0;
    while i < letters.len() {
        index = index * 26 + (letters[i] - b'A' + 1) as usize;
        i += 1;
    }
    index - 1
}

/// Convert column letters to a zero-based index (A → 0, Z → 25, AA → 26)
pub fn letter_to_index(letters: &str) -> SheetmarkResult<usize> {
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(SheetmarkError::InvalidInput(format!(
            "'{}' is not a column letter sequence",
            letters
        )));
    }
    // 13 letters already exceed any real sheet; keeps the arithmetic in range
    if letters.len() > 13 {
        return Err(SheetmarkError::InvalidInput(format!(
            "Column '{}' is out of range",
            letters
        )));
    }
    Ok(decode(letters.as_bytes()))
}

/// Convert a zero-based column index to letters (0 → A, 25 → Z, 26 → AA)
pub fn index_to_letter(index: usize) -> String {
    let mut result = String::new();
    let mut idx = index;

    loop {
        let remainder = idx % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }

    result
}

/// Inclusive span of outlet columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutletRange {
    pub start: usize,
    pub end: usize,
}

impl OutletRange {
    pub const STANDARD: OutletRange = OutletRange {
        start: decode(OUTLET_START_COLUMN.as_bytes()),
        end: decode(OUTLET_END_COLUMN.as_bytes()),
    };

    /// Build a range from column letters, e.g. `("R", "GN")`
    pub fn from_letters(start: &str, end: &str) -> SheetmarkResult<Self> {
        let start_idx = letter_to_index(start)?;
        let end_idx = letter_to_index(end)?;
        if start_idx > end_idx {
            return Err(SheetmarkError::InvalidInput(format!(
                "Outlet range {}:{} is reversed",
                start, end
            )));
        }
        Ok(Self {
            start: start_idx,
            end: end_idx,
        })
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }

    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn start_letter(&self) -> String {
        index_to_letter(self.start)
    }

    pub fn end_letter(&self) -> String {
        index_to_letter(self.end)
    }
}

impl Default for OutletRange {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A1-notation range on a named sheet, e.g. `'Plan'!R1:GN1`
///
/// Rows are 1-based; `last_row: None` means "to the bottom of the sheet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet_title: String,
    pub first_row: usize,
    pub last_row: Option<usize>,
    pub first_column: usize,
    pub last_column: usize,
}

impl A1Range {
    /// Whole columns: `'T'!A:H`
    pub fn columns(sheet_title: &str, first: usize, last: usize) -> Self {
        Self {
            sheet_title: sheet_title.to_string(),
            first_row: 1,
            last_row: None,
            first_column: first,
            last_column: last,
        }
    }

    /// One row across a column span: `'T'!R1:GN1`
    pub fn row(sheet_title: &str, row_number: usize, first: usize, last: usize) -> Self {
        Self {
            sheet_title: sheet_title.to_string(),
            first_row: row_number,
            last_row: Some(row_number),
            first_column: first,
            last_column: last,
        }
    }

    /// A single column from a row downwards: `'T'!S2:S`
    pub fn column_from(sheet_title: &str, column: usize, first_row: usize) -> Self {
        Self {
            sheet_title: sheet_title.to_string(),
            first_row,
            last_row: None,
            first_column: column,
            last_column: column,
        }
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'!", self.sheet_title.replace('\'', "''"))?;
        let first = index_to_letter(self.first_column);
        let last = index_to_letter(self.last_column);
        match self.last_row {
            None if self.first_row <= 1 => write!(f, "{}:{}", first, last),
            None => write!(f, "{}{}:{}", first, self.first_row, last),
            Some(last_row) => write!(f, "{}{}:{}{}", first, self.first_row, last, last_row),
        }
    }
}
