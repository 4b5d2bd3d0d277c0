//! Remote spreadsheet access
//!
//! The engine talks to a spreadsheet only through [`SheetsBackend`]: read a
//! rectangular range as text, and apply a batch of fills atomically.

pub mod auth;
pub mod google;
pub mod memory;
pub mod schema;

use async_trait::async_trait;

use crate::core::columns::A1Range;
use crate::error::SheetmarkResult;
use crate::types::FormatRequest;

pub use auth::{AuthSession, ConnectorTokenSource, StaticToken, TokenSource};
pub use google::GoogleSheetsClient;
pub use memory::MemorySheet;

/// One tab of a spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTab {
    pub sheet_id: i64,
    pub title: String,
}

/// Spreadsheet title and its tabs in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetMeta {
    pub title: String,
    pub tabs: Vec<SheetTab>,
}

#[async_trait]
pub trait SheetsBackend: Send + Sync {
    fn spreadsheet_id(&self) -> &str;

    async fn metadata(&self, session: &AuthSession) -> SheetmarkResult<SpreadsheetMeta>;

    /// Row-major text values; trailing empty cells and rows may be omitted
    async fn read_range(
        &self,
        session: &AuthSession,
        range: &A1Range,
    ) -> SheetmarkResult<Vec<Vec<String>>>;

    /// Apply every request or none of them
    async fn batch_format(
        &self,
        session: &AuthSession,
        requests: &[FormatRequest],
    ) -> SheetmarkResult<()>;
}
