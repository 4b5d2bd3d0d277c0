use super::*;
use crate::error::SheetmarkError;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_list(dir: &TempDir, name: &str, rows: &[(&str, &str)]) -> PathBuf {
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, (a, b)) in rows.iter().enumerate() {
        sheet.write_string(r as u32, 0, *a).unwrap();
        sheet.write_string(r as u32, 1, *b).unwrap();
    }
    workbook.save(&path).unwrap();
    path
}

// =========================================================================
// ingest Tests
// =========================================================================

#[test]
fn test_ingest_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_list(&dir, "list.xlsx", &[("РК", "ТК"), ("Summer", "007"), ("Summer", "12")]);
    assert!(ingest(path, true).is_ok());
}

#[test]
fn test_ingest_rejects_other_extensions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.csv");
    std::fs::write(&path, "a,b\n").unwrap();
    assert!(matches!(
        ingest(path, false),
        Err(SheetmarkError::InvalidInput(_))
    ));
}

#[test]
fn test_ingest_missing_outlets() {
    let dir = TempDir::new().unwrap();
    let path = write_list(&dir, "list.xlsx", &[("Summer", ""), ("Summer", "")]);
    assert!(matches!(
        ingest(path, false),
        Err(SheetmarkError::MissingOutletColumn)
    ));
}

#[test]
fn test_ingest_missing_file() {
    let result = ingest(PathBuf::from("/nonexistent/list.xlsx"), false);
    assert!(matches!(result, Err(SheetmarkError::Excel(_))));
}

// =========================================================================
// Remote command Tests
// =========================================================================

#[tokio::test]
async fn test_query_rejects_bad_args_before_connecting() {
    let config = Config::default();
    let result = query(&config, vec!["дата".to_string(), "завтра".to_string()]).await;
    assert!(matches!(result, Err(SheetmarkError::InvalidInput(_))));
}

#[tokio::test]
async fn test_status_without_spreadsheet_id() {
    let config = Config::default();
    assert!(matches!(
        status(&config).await,
        Err(SheetmarkError::InvalidInput(_))
    ));
}
