//! Campaign sheet operations
//!
//! Each operation re-reads whatever it needs from the backend; nothing is
//! cached between calls. Highlights are serialized per spreadsheet so two of
//! them cannot interleave their read-resolve-write cycles in this process.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::columns::{A1Range, OutletRange};
use crate::core::header_index::HeaderIndex;
use crate::core::highlighter::CellHighlighter;
use crate::core::query::{self, OutletColumn, FIRST_DATA_ROW, LAST_DATA_COLUMN, NAME_COLUMN};
use crate::core::row_locator;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::excel::ingest;
use crate::sheets::{AuthSession, SheetsBackend};
use crate::types::{
    CampaignRow, HighlightOutcome, IngestedList, QueryFilter, QueryResult, SpreadsheetHandle,
    SpreadsheetInfo,
};

/// What happened to one uploaded outlet list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessReport {
    pub list: IngestedList,
    /// `None` when the campaign is not in the sheet; nothing was written then
    pub row: Option<CampaignRow>,
    pub outcome: Option<HighlightOutcome>,
}

pub struct CampaignSheet {
    backend: Arc<dyn SheetsBackend>,
    range: OutletRange,
    write_lock: Mutex<()>,
}

impl CampaignSheet {
    pub fn new(backend: Arc<dyn SheetsBackend>) -> Self {
        Self::with_range(backend, OutletRange::default())
    }

    pub fn with_range(backend: Arc<dyn SheetsBackend>, range: OutletRange) -> Self {
        Self {
            backend,
            range,
            write_lock: Mutex::new(()),
        }
    }

    pub fn outlet_range(&self) -> OutletRange {
        self.range
    }

    /// Resolve the spreadsheet and its first tab
    pub async fn handle(&self, session: &AuthSession) -> SheetmarkResult<SpreadsheetHandle> {
        let meta = self.backend.metadata(session).await?;
        let tab = meta
            .tabs
            .into_iter()
            .next()
            .ok_or_else(|| SheetmarkError::Remote("No sheets found in spreadsheet".to_string()))?;
        Ok(SpreadsheetHandle::new(
            self.backend.spreadsheet_id(),
            tab.title,
            tab.sheet_id,
        ))
    }

    pub async fn spreadsheet_info(&self, session: &AuthSession) -> SheetmarkResult<SpreadsheetInfo> {
        let meta = self.backend.metadata(session).await?;
        Ok(SpreadsheetInfo::new(self.backend.spreadsheet_id(), meta.title))
    }

    pub async fn find_campaign_row(
        &self,
        session: &AuthSession,
        campaign_name: &str,
    ) -> SheetmarkResult<Option<CampaignRow>> {
        let handle = self.handle(session).await?;
        let range = A1Range::columns(&handle.sheet_title, NAME_COLUMN, NAME_COLUMN);
        let column_a = self.backend.read_range(session, &range).await?;
        let row = row_locator::find(&column_a, campaign_name);
        tracing::debug!(campaign = campaign_name, row = ?row.as_ref().map(|r| r.row_number), "campaign lookup");
        Ok(row)
    }

    /// Outlet headers from row 1 of the outlet range
    pub async fn header_index(
        &self,
        session: &AuthSession,
        handle: &SpreadsheetHandle,
    ) -> SheetmarkResult<HeaderIndex> {
        let range = A1Range::row(&handle.sheet_title, 1, self.range.start, self.range.end);
        let header = self
            .backend
            .read_range(session, &range)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default();
        Ok(HeaderIndex::for_range(&header, self.range))
    }

    /// Mark the outlet cells of one campaign row green in a single batch
    pub async fn highlight_cells<S: AsRef<str>>(
        &self,
        session: &AuthSession,
        row_number: usize,
        tokens: &[S],
    ) -> SheetmarkResult<HighlightOutcome> {
        if row_number == 0 {
            return Err(SheetmarkError::InvalidInput(
                "Row numbers start at 1".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        let handle = self.handle(session).await?;
        let headers = self.header_index(session, &handle).await?;
        let plan = CellHighlighter::new(&headers, self.range, handle.sheet_id).plan(row_number, tokens);

        if !plan.is_empty() {
            self.backend.batch_format(session, &plan.requests).await?;
        }

        tracing::info!(
            row = row_number,
            highlighted = plan.outcome.highlighted,
            not_found = plan.outcome.not_found.len(),
            "highlight applied"
        );
        Ok(plan.outcome)
    }

    /// Video records matching `filter` with their total duration
    pub async fn query_video_duration(
        &self,
        session: &AuthSession,
        filter: &QueryFilter,
    ) -> SheetmarkResult<QueryResult> {
        let handle = self.handle(session).await?;
        let range = A1Range::columns(&handle.sheet_title, NAME_COLUMN, LAST_DATA_COLUMN);
        let rows = self.backend.read_range(session, &range).await?;

        let outlet = match &filter.outlet_number {
            Some(token) => Some(self.outlet_column(session, &handle, token).await?),
            None => None,
        };

        let result = query::run(&rows, filter, outlet.as_ref());
        tracing::info!(
            count = result.count,
            total_duration = result.total_duration,
            "duration query"
        );
        Ok(result)
    }

    async fn outlet_column(
        &self,
        session: &AuthSession,
        handle: &SpreadsheetHandle,
        token: &str,
    ) -> SheetmarkResult<OutletColumn> {
        let headers = self.header_index(session, handle).await?;
        let Some(column) = headers.resolve(token) else {
            return Ok(OutletColumn::Unresolved);
        };
        let range = A1Range::column_from(&handle.sheet_title, column, FIRST_DATA_ROW);
        let values = self.backend.read_range(session, &range).await?;
        Ok(OutletColumn::from_values(column, &values, FIRST_DATA_ROW))
    }

    /// Ingest an uploaded table, find its campaign and highlight its outlets.
    ///
    /// Invalid tables fail before any remote call.
    pub async fn process_table<R: AsRef<[String]>>(
        &self,
        session: &AuthSession,
        table: &[R],
    ) -> SheetmarkResult<ProcessReport> {
        let list = ingest::ingest(table)?;
        let row = self.find_campaign_row(session, &list.campaign_name).await?;

        let outcome = match &row {
            Some(row) => Some(self.highlight_cells(session, row.row_number, &list.tokens).await?),
            None => {
                tracing::info!(campaign = %list.campaign_name, "campaign not found in sheet");
                None
            }
        };

        Ok(ProcessReport { list, row, outcome })
    }
}
