//! In-memory spreadsheet backend
//!
//! Behaves like the remote API for the calls this crate makes: reads drop
//! trailing empty cells and rows, and a batch either applies in full or, when a
//! failure is injected, not at all.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::auth::AuthSession;
use super::{SheetTab, SheetsBackend, SpreadsheetMeta};
use crate::core::columns::A1Range;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::{Color, FormatRequest};

#[derive(Debug, Default)]
struct Grid {
    cells: Vec<Vec<String>>,
    backgrounds: HashMap<(usize, usize), Color>,
}

pub struct MemorySheet {
    spreadsheet_id: String,
    title: String,
    tab: SheetTab,
    grid: Mutex<Grid>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    reads: AtomicUsize,
    batches: AtomicUsize,
}

impl MemorySheet {
    pub fn new(title: impl Into<String>, tab_title: impl Into<String>, sheet_id: i64) -> Self {
        Self {
            spreadsheet_id: "memory".to_string(),
            title: title.into(),
            tab: SheetTab {
                sheet_id,
                title: tab_title.into(),
            },
            grid: Mutex::new(Grid::default()),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
        }
    }

    /// Sheet with the given rows, row 1 first
    pub fn with_rows<R, S>(title: &str, rows: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let sheet = Self::new(title, "Sheet1", 0);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.as_ref().iter().enumerate() {
                sheet.set_cell(r + 1, c, value.as_ref());
            }
        }
        sheet
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Grid> {
        // A panic while holding the lock leaves plain data behind; keep using it
        self.grid.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set a cell by 1-based row and zero-based column
    pub fn set_cell(&self, row_number: usize, column: usize, value: &str) {
        let mut grid = self.lock();
        let r = row_number.saturating_sub(1);
        if grid.cells.len() <= r {
            grid.cells.resize(r + 1, Vec::new());
        }
        let row = &mut grid.cells[r];
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value.to_string();
    }

    /// Background of a cell by 1-based row and zero-based column
    pub fn background(&self, row_number: usize, column: usize) -> Option<Color> {
        self.lock()
            .backgrounds
            .get(&(row_number.saturating_sub(1), column))
            .copied()
    }

    pub fn highlighted_cells(&self) -> usize {
        self.lock().backgrounds.len()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn batch_count(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SheetsBackend for MemorySheet {
    fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn metadata(&self, _session: &AuthSession) -> SheetmarkResult<SpreadsheetMeta> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SheetmarkError::Remote("metadata read failed".to_string()));
        }
        Ok(SpreadsheetMeta {
            title: self.title.clone(),
            tabs: vec![self.tab.clone()],
        })
    }

    async fn read_range(
        &self,
        _session: &AuthSession,
        range: &A1Range,
    ) -> SheetmarkResult<Vec<Vec<String>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SheetmarkError::Remote(format!("read of {} failed", range)));
        }
        if range.sheet_title != self.tab.title {
            return Err(SheetmarkError::Remote(format!(
                "Unable to parse range: {}",
                range
            )));
        }
        self.reads.fetch_add(1, Ordering::SeqCst);

        let grid = self.lock();
        let first = range.first_row.max(1) - 1;
        let last = range
            .last_row
            .map(|r| r.min(grid.cells.len()))
            .unwrap_or(grid.cells.len());

        let mut rows: Vec<Vec<String>> = (first..last)
            .map(|r| {
                let row = &grid.cells[r];
                let mut values: Vec<String> = (range.first_column..=range.last_column)
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .collect();
                while values.last().is_some_and(|v| v.is_empty()) {
                    values.pop();
                }
                values
            })
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn batch_format(
        &self,
        _session: &AuthSession,
        requests: &[FormatRequest],
    ) -> SheetmarkResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SheetmarkError::Remote("batchUpdate failed".to_string()));
        }
        if let Some(bad) = requests.iter().find(|r| r.sheet_id != self.tab.sheet_id) {
            return Err(SheetmarkError::Remote(format!(
                "No grid with id: {}",
                bad.sheet_id
            )));
        }

        let mut grid = self.lock();
        for req in requests {
            for r in req.start_row..req.end_row {
                for c in req.start_column..req.end_column {
                    grid.backgrounds.insert((r, c), req.background);
                }
            }
        }
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
