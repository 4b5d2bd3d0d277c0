//! Sheetmark - campaign outlet highlighting over Google Sheets
//!
//! A campaign plan sheet has one row per advertising campaign (column A) and
//! one column per retail outlet (`R` through `GN`, outlet numbers in row 1).
//! This library marks the outlets of a campaign green, given an uploaded
//! two-column Excel list, and totals video durations by date, outlet type or
//! outlet number.
//!
//! # Example
//!
//! ```no_run
//! use sheetmark::service::CampaignSheet;
//! use sheetmark::sheets::{AuthSession, MemorySheet};
//! use std::sync::Arc;
//!
//! # async fn run() -> sheetmark::SheetmarkResult<()> {
//! let sheet = Arc::new(MemorySheet::with_rows(
//!     "Plan",
//!     &[vec!["РК", "1001"], vec!["Summer Sale", ""]],
//! ));
//! let service = CampaignSheet::new(sheet);
//! let session = AuthSession::new("token", None);
//!
//! let row = service.find_campaign_row(&session, "summer sale").await?;
//! println!("{:?}", row);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod service;
pub mod sheets;
pub mod types;

// Re-export commonly used types
pub use error::{SheetmarkError, SheetmarkResult};
pub use service::{CampaignSheet, ProcessReport};
pub use types::{
    CampaignRow, HighlightOutcome, IngestedList, QueryFilter, QueryResult, SpreadsheetHandle,
    VideoRecord,
};
