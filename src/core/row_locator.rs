//! Campaign row lookup in column A

use crate::types::CampaignRow;

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// First row whose column A equals `campaign_name`, ignoring case and surrounding whitespace.
///
/// `column_a` holds the rows of an `A:A` read; a row may be empty when its cell is blank.
/// Near misses are reported as not found.
pub fn find<R: AsRef<[String]>>(column_a: &[R], campaign_name: &str) -> Option<CampaignRow> {
    let wanted = normalize(campaign_name);
    if wanted.is_empty() {
        return None;
    }

    column_a.iter().enumerate().find_map(|(i, row)| {
        let cell = row.as_ref().first()?;
        (normalize(cell) == wanted).then(|| CampaignRow {
            row_number: i + 1,
            cell_text: cell.clone(),
        })
    })
}
