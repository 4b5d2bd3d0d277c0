use serde::{Deserialize, Serialize};

//==============================================================================
// Spreadsheet identity
//==============================================================================

/// Remote spreadsheet plus the sheet every operation works on (the first one)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHandle {
    pub spreadsheet_id: String,
    pub sheet_title: String,
    pub sheet_id: i64,
}

impl SpreadsheetHandle {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        sheet_title: impl Into<String>,
        sheet_id: i64,
    ) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_title: sheet_title.into(),
            sheet_id,
        }
    }
}

/// Title and browser URL of the connected spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetInfo {
    pub title: String,
    pub url: String,
}

impl SpreadsheetInfo {
    pub fn new(spreadsheet_id: &str, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: format!("https://docs.google.com/spreadsheets/d/{}", spreadsheet_id),
        }
    }
}

//==============================================================================
// Campaign lookup and highlighting
//==============================================================================

/// Row of a campaign in column A
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRow {
    /// 1-based row number
    pub row_number: usize,
    /// Cell text exactly as stored in the sheet
    pub cell_text: String,
}

/// RGB color with channels in `0.0..=1.0`, as the Sheets API expects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const GREEN: Color = Color {
        red: 0.0,
        green: 1.0,
        blue: 0.0,
    };
}

/// Background fill of one rectangle of cells.
///
/// Row and column bounds are zero-based and end-exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRequest {
    pub sheet_id: i64,
    pub start_row: usize,
    pub end_row: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub background: Color,
}

impl FormatRequest {
    /// Fill for the single cell at a 1-based row and zero-based column
    pub fn single_cell(sheet_id: i64, row_number: usize, column: usize, background: Color) -> Self {
        Self {
            sheet_id,
            start_row: row_number.saturating_sub(1),
            end_row: row_number,
            start_column: column,
            end_column: column + 1,
            background,
        }
    }
}

/// Result of one highlight call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightOutcome {
    pub highlighted: usize,
    pub not_found: Vec<String>,
}

//==============================================================================
// Duration queries
//==============================================================================

/// One video placement row of the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoRecord {
    pub campaign_name: String,
    pub outlet_type: String,
    /// Seconds, possibly fractional
    pub duration: f64,
    /// `DD.MM.YYYY` when the cell parses as a date, otherwise the cell text
    pub start_date: String,
    pub end_date: String,
    pub paid: String,
    /// 1-based row number
    pub row_number: usize,
}

/// Query filters; all present filters must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub date: Option<chrono::NaiveDate>,
    pub outlet_type: Option<String>,
    pub outlet_number: Option<String>,
}

impl QueryFilter {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.outlet_type.is_none() && self.outlet_number.is_none()
    }
}

/// Matched records and their total duration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    pub records: Vec<VideoRecord>,
    pub count: usize,
    pub total_duration: f64,
}

impl QueryResult {
    pub fn from_records(records: Vec<VideoRecord>) -> Self {
        let total_duration = records.iter().map(|r| r.duration).sum();
        Self {
            count: records.len(),
            total_duration,
            records,
        }
    }
}

//==============================================================================
// Ingest
//==============================================================================

/// Campaign name and outlet tokens extracted from an uploaded table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedList {
    pub campaign_name: String,
    pub tokens: Vec<String>,
}
