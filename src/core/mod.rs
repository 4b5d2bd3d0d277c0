//! Sheet-independent engine: column codec, dates, header lookup, row lookup,
//! highlight planning and duration queries

pub mod columns;
pub mod dates;
pub mod header_index;
pub mod highlighter;
pub mod query;
pub mod row_locator;

pub use columns::{index_to_letter, letter_to_index, A1Range, OutletRange};
pub use header_index::HeaderIndex;
pub use highlighter::{CellHighlighter, HighlightPlan};
pub use query::{OutletColumn, QueryEngine};
