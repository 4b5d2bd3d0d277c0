//! CLI command handlers

pub mod commands;
pub mod query_args;
pub mod report;

pub use commands::{highlight, ingest, locate, query, status};
pub use query_args::QueryArgParser;
