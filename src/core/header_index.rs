//! Outlet header row → column index lookup

use std::collections::HashMap;

use super::columns::OutletRange;

/// Token with leading zeros removed; all-zero tokens become `"0"`
pub fn strip_leading_zeros(token: &str) -> &str {
    let stripped = token.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}

/// A key that pointed at one column and was then overwritten by a later one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCollision {
    pub token: String,
    pub replaced: usize,
    pub column: usize,
}

/// Outlet token → absolute zero-based column index.
///
/// Every header is stored under its trimmed text and, when different, under its
/// zero-stripped form. When two headers share a key the later column wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
    collisions: Vec<HeaderCollision>,
}

impl HeaderIndex {
    /// Index a header row whose first cell sits at column `start_index`.
    ///
    /// Cells beyond `end_index` are ignored.
    pub fn build<S: AsRef<str>>(header_row: &[S], start_index: usize, end_index: usize) -> Self {
        let mut index = HeaderIndex::default();
        if end_index < start_index {
            return index;
        }
        let width = end_index - start_index + 1;

        for (offset, cell) in header_row.iter().take(width).enumerate() {
            let header = cell.as_ref().trim();
            if header.is_empty() {
                continue;
            }
            let column = start_index + offset;
            index.insert(header, column);

            let normalized = strip_leading_zeros(header);
            if normalized != header {
                index.insert(normalized, column);
            }
        }

        index
    }

    /// Index a header row over an outlet range
    pub fn for_range<S: AsRef<str>>(header_row: &[S], range: OutletRange) -> Self {
        Self::build(header_row, range.start, range.end)
    }

    fn insert(&mut self, token: &str, column: usize) {
        if let Some(replaced) = self.columns.insert(token.to_string(), column) {
            if replaced != column {
                tracing::warn!(
                    token,
                    replaced,
                    column,
                    "outlet header collides with an earlier column, later column wins"
                );
                self.collisions.push(HeaderCollision {
                    token: token.to_string(),
                    replaced,
                    column,
                });
            }
        }
    }

    /// Column for a token (trimmed before lookup)
    pub fn resolve(&self, token: &str) -> Option<usize> {
        self.columns.get(token.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn collisions(&self) -> &[HeaderCollision] {
        &self.collisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_leading_zeros() {
        assert_eq!(strip_leading_zeros("007"), "7");
        assert_eq!(strip_leading_zeros("1001"), "1001");
        assert_eq!(strip_leading_zeros("000"), "0");
        assert_eq!(strip_leading_zeros("0"), "0");
        assert_eq!(strip_leading_zeros("0A1"), "A1");
    }

    #[test]
    fn test_build_offsets_from_start() {
        let index = HeaderIndex::build(&["1001", "", "1003"], 17, 195);
        assert_eq!(index.resolve("1001"), Some(17));
        assert_eq!(index.resolve("1003"), Some(19));
        assert_eq!(index.resolve(""), None);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_stripped_form_shares_column() {
        let index = HeaderIndex::build(&["007"], 17, 195);
        assert_eq!(index.resolve("007"), Some(17));
        assert_eq!(index.resolve("7"), Some(17));
        assert_eq!(index.resolve("07"), None);
    }

    #[test]
    fn test_headers_are_trimmed() {
        let index = HeaderIndex::build(&["  42 "], 0, 10);
        assert_eq!(index.resolve("42"), Some(0));
        assert_eq!(index.resolve(" 42"), Some(0));
    }

    #[test]
    fn test_later_column_wins_on_collision() {
        let index = HeaderIndex::build(&["07", "7"], 17, 195);
        assert_eq!(index.resolve("07"), Some(17));
        assert_eq!(index.resolve("7"), Some(18));
        assert_eq!(
            index.collisions(),
            &[HeaderCollision {
                token: "7".to_string(),
                replaced: 17,
                column: 18,
            }]
        );
    }

    #[test]
    fn test_cells_past_end_are_ignored() {
        let index = HeaderIndex::build(&["1", "2", "3"], 5, 6);
        assert_eq!(index.resolve("2"), Some(6));
        assert_eq!(index.resolve("3"), None);
    }

    #[test]
    fn test_for_range() {
        let index = HeaderIndex::for_range(&["1001"], OutletRange::default());
        assert_eq!(index.resolve("1001"), Some(17));
    }
}
