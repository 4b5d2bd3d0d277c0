//! Engine property tests
//!
//! Column codec, header lookup, highlighting, queries and ingest exercised
//! through the public API against an in-memory sheet.

use pretty_assertions::assert_eq;
use sheetmark::core::columns::{index_to_letter, letter_to_index, OutletRange};
use sheetmark::core::header_index::HeaderIndex;
use sheetmark::core::{dates, query};
use sheetmark::excel::ingest;
use sheetmark::service::CampaignSheet;
use sheetmark::sheets::{AuthSession, MemorySheet};
use sheetmark::types::{Color, QueryFilter};
use std::sync::Arc;

fn session() -> AuthSession {
    AuthSession::new("test-token", None)
}

fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

/// Plan sheet: A..H data columns, outlets 1001 at R and 1003 at T
fn plan_sheet() -> Arc<MemorySheet> {
    let sheet = MemorySheet::new("Plan 2025", "Sheet1", 0);
    let header = ["РК", "Тип", "Хрон", "", "", "Старт", "Финиш", "Оплата"];
    for (c, value) in header.iter().enumerate() {
        sheet.set_cell(1, c, value);
    }
    sheet.set_cell(1, letter_to_index("R").unwrap(), "1001");
    sheet.set_cell(1, letter_to_index("T").unwrap(), "1003");

    let data = [
        ["Summer Sale", "ГМ", "30", "", "", "01.06.2025", "30.06.2025", "да"],
        ["Autumn", "Частично ГМ", "15", "", "", "01.09.2025", "30.09.2025", ""],
        ["Winter", "СМ", "20,5", "", "", "2025-12-01", "2025-12-31", ""],
    ];
    for (r, row) in data.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.set_cell(r + 2, c, value);
        }
    }
    Arc::new(sheet)
}

// ═══════════════════════════════════════════════════════════════════════════
// COLUMN CODEC
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_letters_round_trip_through_zz() {
    for index in 0..702 {
        let letters = index_to_letter(index);
        assert_eq!(letter_to_index(&letters).unwrap(), index);
    }
    assert_eq!(index_to_letter(701), "ZZ");
}

#[test]
fn test_outlet_range_bounds() {
    let range = OutletRange::STANDARD;
    assert_eq!(range.start, 17);
    assert_eq!(range.end, 195);
    assert!(range.start < range.end);
    assert_eq!(range.width(), 179);
}

// ═══════════════════════════════════════════════════════════════════════════
// HEADER INDEX
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_zero_padded_tokens_share_a_column() {
    let header: Vec<String> = vec!["007".to_string()];
    let index = HeaderIndex::build(&header, 17, 195);
    assert_eq!(index.resolve("007"), Some(17));
    assert_eq!(index.resolve("7"), Some(17));
    assert_eq!(index.resolve(" 7 "), Some(17));
}

// ═══════════════════════════════════════════════════════════════════════════
// DATES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_iso_and_dotted_dates_agree() {
    assert_eq!(dates::parse("2024-12-25"), dates::parse("25.12.2024"));
    assert!(dates::parse("25.12.2024").is_some());
}

// ═══════════════════════════════════════════════════════════════════════════
// HIGHLIGHT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_end_to_end_highlight() {
    let sheet = plan_sheet();
    let service = CampaignSheet::new(sheet.clone());
    let table = rows(&[&["РК", "ТК"], &["Summer Sale", "1001"], &["Summer Sale", "1003"], &["Summer Sale", "9999"]]);

    let report = service.process_table(&session(), &table).await.unwrap();
    let row = report.row.unwrap();
    assert_eq!(row.row_number, 2);

    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.highlighted, 2);
    assert_eq!(outcome.not_found, vec!["9999".to_string()]);
    assert_eq!(sheet.background(2, letter_to_index("R").unwrap()), Some(Color::GREEN));
    assert_eq!(sheet.background(2, letter_to_index("T").unwrap()), Some(Color::GREEN));
    assert_eq!(sheet.highlighted_cells(), 2);
}

#[tokio::test]
async fn test_duplicate_tokens_collapse() {
    let sheet = plan_sheet();
    let service = CampaignSheet::new(sheet.clone());
    let outcome = service
        .highlight_cells(&session(), 2, &["1001", "1001", "01001"])
        .await
        .unwrap();
    assert_eq!(outcome.highlighted, 1);
    assert_eq!(outcome.not_found, vec!["01001".to_string()]);
    assert_eq!(sheet.highlighted_cells(), 1);
}

#[tokio::test]
async fn test_highlight_is_idempotent() {
    let sheet = plan_sheet();
    let service = CampaignSheet::new(sheet.clone());
    let first = service.highlight_cells(&session(), 3, &["1003"]).await.unwrap();
    let second = service.highlight_cells(&session(), 3, &["1003"]).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(sheet.highlighted_cells(), 1);
    assert_eq!(sheet.batch_count(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// QUERY
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_query_by_date_window() {
    let service = CampaignSheet::new(plan_sheet());
    let inside = QueryFilter {
        date: dates::parse("15.06.2025"),
        ..QueryFilter::default()
    };
    let result = service.query_video_duration(&session(), &inside).await.unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.records[0].campaign_name, "Summer Sale");
    assert_eq!(result.total_duration, 30.0);

    let outside = QueryFilter {
        date: dates::parse("15.07.2025"),
        ..QueryFilter::default()
    };
    let result = service.query_video_duration(&session(), &outside).await.unwrap();
    assert_eq!(result.count, 0);
}

#[tokio::test]
async fn test_query_type_matches_partial() {
    let service = CampaignSheet::new(plan_sheet());
    let filter = QueryFilter {
        outlet_type: Some("ГМ".to_string()),
        ..QueryFilter::default()
    };
    let result = service.query_video_duration(&session(), &filter).await.unwrap();
    let names: Vec<&str> = result.records.iter().map(|r| r.campaign_name.as_str()).collect();
    assert_eq!(names, vec!["Summer Sale", "Autumn"]);
    assert_eq!(result.total_duration, 45.0);
}

#[tokio::test]
async fn test_query_by_outlet_column() {
    let sheet = plan_sheet();
    sheet.set_cell(4, letter_to_index("T").unwrap(), "1");
    let service = CampaignSheet::new(sheet);

    let filter = QueryFilter {
        outlet_number: Some("1003".to_string()),
        ..QueryFilter::default()
    };
    let result = service.query_video_duration(&session(), &filter).await.unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.records[0].campaign_name, "Winter");
    assert_eq!(result.total_duration, 20.5);
    assert_eq!(result.records[0].start_date, "01.12.2025");

    let unknown = QueryFilter {
        outlet_number: Some("4242".to_string()),
        ..QueryFilter::default()
    };
    let result = service.query_video_duration(&session(), &unknown).await.unwrap();
    assert_eq!(result.count, 0);
}

#[test]
fn test_query_engine_skips_short_rows() {
    let sheet_rows = rows(&[&["РК", "Тип", "Хрон"], &["Only name", "ГМ"], &["Real", "ГМ", "10"]]);
    let result = query::run(&sheet_rows, &QueryFilter::default(), None);
    assert_eq!(result.count, 1);
    assert_eq!(result.records[0].row_number, 3);
}

// ═══════════════════════════════════════════════════════════════════════════
// INGEST
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_ingest_majority_campaign() {
    let table = rows(&[
        &["РК", "ТК"],
        &["Summer Sale", "1001"],
        &["Summer Sale", "1003"],
        &["Typo Sale", "1003"],
    ]);
    let list = ingest(&table).unwrap();
    assert_eq!(list.campaign_name, "Summer Sale");
    assert_eq!(list.tokens, vec!["1001".to_string(), "1003".to_string()]);
}
