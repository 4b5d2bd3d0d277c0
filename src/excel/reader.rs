//! Spreadsheet file → text table
//!
//! Only the first worksheet is read. Every cell becomes text: strings verbatim
//! (so `007` keeps its zeros), whole numbers without a trailing `.0`, dates as
//! `DD.MM.YYYY`.

use crate::error::{SheetmarkError, SheetmarkResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

const SUPPORTED_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Whether a file name has a spreadsheet extension this reader accepts
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Text of a single cell
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string().to_uppercase(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => value.format("%d.%m.%Y").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Rows of a range, left-padded so index 0 is always column A
pub fn range_to_table(range: &Range<Data>) -> Vec<Vec<String>> {
    let first_column = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            let mut cells = vec![String::new(); first_column];
            cells.extend(row.iter().map(cell_text));
            cells
        })
        .collect()
}

/// Read the first worksheet of an Excel/ODS file as text rows
pub fn read_first_sheet(path: &Path) -> SheetmarkResult<Vec<Vec<String>>> {
    if !is_supported(path) {
        return Err(SheetmarkError::InvalidInput(format!(
            "'{}' is not an Excel file (.xlsx or .xls)",
            path.display()
        )));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SheetmarkError::Excel(format!("Failed to open Excel file: {}", e)))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => {
            range.map_err(|e| SheetmarkError::Excel(format!("Failed to read worksheet: {}", e)))?
        }
        None => return Ok(Vec::new()),
    };

    if range.is_empty() {
        return Ok(Vec::new());
    }

    Ok(range_to_table(&range))
}
