//! Google Sheets v4 wire types
//!
//! Only the fields this crate reads or writes are modelled. Everything coming
//! off the wire is converted to domain types before it leaves the client.

use serde::{Deserialize, Serialize};

use crate::types::{Color, FormatRequest};

/// Field mask for background-only fills
pub const BACKGROUND_FIELDS: &str = "userEnteredFormat.backgroundColor";

//==============================================================================
// spreadsheets.get
//==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub properties: Option<SpreadsheetProperties>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
}

//==============================================================================
// spreadsheets.values.get
//==============================================================================

/// A cell as returned by `values.get`; formatted reads give strings, but
/// unformatted ones may give numbers or booleans
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn into_text(self) -> String {
        match self {
            CellValue::Text(s) => s,
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string().to_uppercase(),
            CellValue::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<CellValue>>,
}

impl ValueRange {
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(CellValue::into_text).collect())
            .collect()
    }
}

//==============================================================================
// spreadsheets.batchUpdate
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateRequest {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub repeat_cell: RepeatCellRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatCellRequest {
    pub range: GridRange,
    pub cell: CellData,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: usize,
    pub end_row_index: usize,
    pub start_column_index: usize,
    pub end_column_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_format: CellFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub background_color: Color,
}

impl From<&FormatRequest> for Request {
    fn from(req: &FormatRequest) -> Self {
        Request {
            repeat_cell: RepeatCellRequest {
                range: GridRange {
                    sheet_id: req.sheet_id,
                    start_row_index: req.start_row,
                    end_row_index: req.end_row,
                    start_column_index: req.start_column,
                    end_column_index: req.end_column,
                },
                cell: CellData {
                    user_entered_format: CellFormat {
                        background_color: req.background,
                    },
                },
                fields: BACKGROUND_FIELDS.to_string(),
            },
        }
    }
}

impl BatchUpdateRequest {
    pub fn from_formats(requests: &[FormatRequest]) -> Self {
        Self {
            requests: requests.iter().map(Request::from).collect(),
        }
    }
}

//==============================================================================
// Errors
//==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}
