//! Campaign + outlet list extraction from an uploaded two-column table
//!
//! Column A repeats the campaign name, column B lists one outlet number per row.

use std::collections::{HashMap, HashSet};

use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::IngestedList;

const CAMPAIGN_HEADER_MARKERS: [&str; 3] = ["рк", "кампани", "campaign"];
const OUTLET_HEADER_MARKERS: [&str; 3] = ["тк", "точ", "outlet"];

fn cell<R: AsRef<[String]>>(row: &R, index: usize) -> &str {
    row.as_ref().get(index).map(|s| s.trim()).unwrap_or("")
}

fn looks_like_header(first_a: &str, first_b: &str) -> bool {
    let a = first_a.to_lowercase();
    let b = first_b.to_lowercase();

    let campaign_label =
        !a.is_empty() && (a == "a" || CAMPAIGN_HEADER_MARKERS.iter().any(|m| a.contains(m)));
    let outlet_label =
        !b.is_empty() && (b == "b" || OUTLET_HEADER_MARKERS.iter().any(|m| b.contains(m)));

    campaign_label || outlet_label
}

/// Most frequent name; ties go to the one seen first
fn majority(names: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for name in names {
        let count = counts[name.as_str()];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((name.as_str(), count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// Extract the campaign name and unique outlet tokens from `table`
pub fn ingest<R: AsRef<[String]>>(table: &[R]) -> SheetmarkResult<IngestedList> {
    if table.is_empty() {
        return Err(SheetmarkError::EmptyInput);
    }

    let skip = usize::from(looks_like_header(cell(&table[0], 0), cell(&table[0], 1)));

    let mut names = Vec::new();
    let mut tokens = Vec::new();
    for row in &table[skip..] {
        let name = cell(row, 0);
        if !name.is_empty() {
            names.push(name.to_string());
        }
        let token = cell(row, 1);
        if !token.is_empty() {
            tokens.push(token.to_string());
        }
    }

    let campaign_name = majority(&names).ok_or(SheetmarkError::MissingCampaignColumn)?;
    if tokens.is_empty() {
        return Err(SheetmarkError::MissingOutletColumn);
    }

    let mut seen = HashSet::new();
    tokens.retain(|t| seen.insert(t.clone()));

    Ok(IngestedList {
        campaign_name,
        tokens,
    })
}
