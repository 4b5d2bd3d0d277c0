//! Batch highlight planning
//!
//! Turns a list of outlet tokens into one batch of single-cell fills. Nothing is
//! sent from here; the service submits the batch as one atomic request.

use std::collections::HashSet;

use super::columns::OutletRange;
use super::header_index::HeaderIndex;
use crate::types::{Color, FormatRequest, HighlightOutcome};

/// Fill requests for one campaign row plus the outcome to report once they are applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightPlan {
    pub requests: Vec<FormatRequest>,
    pub outcome: HighlightOutcome,
}

impl HighlightPlan {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Resolves outlet tokens against a header index for one sheet
pub struct CellHighlighter<'a> {
    headers: &'a HeaderIndex,
    range: OutletRange,
    sheet_id: i64,
}

impl<'a> CellHighlighter<'a> {
    pub fn new(headers: &'a HeaderIndex, range: OutletRange, sheet_id: i64) -> Self {
        Self {
            headers,
            range,
            sheet_id,
        }
    }

    /// Plan fills for `tokens` on a 1-based `row_number`.
    ///
    /// Tokens are trimmed and deduplicated (first occurrence kept); empty ones are
    /// dropped. Tokens that do not resolve inside the outlet range are reported in
    /// `not_found` in input order.
    pub fn plan<S: AsRef<str>>(&self, row_number: usize, tokens: &[S]) -> HighlightPlan {
        let mut plan = HighlightPlan::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() || !seen.insert(token) {
                continue;
            }

            match self.headers.resolve(token) {
                Some(column) if self.range.contains(column) => {
                    plan.requests.push(FormatRequest::single_cell(
                        self.sheet_id,
                        row_number,
                        column,
                        Color::GREEN,
                    ));
                }
                _ => plan.outcome.not_found.push(token.to_string()),
            }
        }

        plan.outcome.highlighted = plan.requests.len();
        plan
    }
}
