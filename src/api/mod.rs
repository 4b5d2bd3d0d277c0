//! Sheetmark API Server module
//!
//! Run with `sheetmark-server`.

pub mod handlers;
pub mod server;

pub use server::{build_router, run_api_server, ApiConfig, AppState, SheetConnection};
