//! Excel input
//!
//! Uploaded outlet lists are read with calamine into text rows, then reduced
//! to a campaign name and its outlet tokens.

pub mod ingest;
pub mod reader;

pub use ingest::ingest;
pub use reader::{is_supported, read_first_sheet};
