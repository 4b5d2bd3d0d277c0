//! API integration tests
//!
//! Requests go through the full router with an in-memory spreadsheet behind it.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sheetmark::api::handlers::ApiResponse;
use sheetmark::api::{build_router, ApiConfig, AppState, SheetConnection};
use sheetmark::core::letter_to_index;
use sheetmark::service::CampaignSheet;
use sheetmark::sheets::{MemorySheet, StaticToken};
use std::sync::Arc;
use tower::ServiceExt;

fn plan_sheet() -> Arc<MemorySheet> {
    let sheet = MemorySheet::new("Plan 2025", "Sheet1", 0);
    sheet.set_cell(1, 0, "РК");
    sheet.set_cell(1, letter_to_index("R").unwrap(), "1001");
    let data = ["Summer Sale", "ГМ", "30", "", "", "01.06.2025", "30.06.2025"];
    for (c, value) in data.iter().enumerate() {
        sheet.set_cell(2, c, value);
    }
    Arc::new(sheet)
}

fn app_with(sheet: Arc<MemorySheet>) -> Router {
    let connection = SheetConnection::new(
        CampaignSheet::new(sheet),
        Arc::new(StaticToken::new("tok")),
    );
    build_router(Arc::new(AppState::new(Some(connection))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG AND RESPONSE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_config_default() {
    let config = ApiConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
}

#[test]
fn test_api_response_shapes() {
    let ok = serde_json::to_value(ApiResponse::ok(3)).unwrap();
    assert_eq!(ok["success"], true);
    assert_eq!(ok["data"], 3);
    assert!(ok.get("error").is_none());
    assert_eq!(ok["request_id"].as_str().unwrap().len(), 36);

    let err = serde_json::to_value(ApiResponse::<()>::err("boom")).unwrap();
    assert_eq!(err["success"], false);
    assert_eq!(err["error"], "boom");
    assert!(err.get("data").is_none());
    assert!(err.get("retryable").is_none());
}

#[tokio::test]
async fn test_cors_allows_only_local_origins() {
    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/highlight")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    };
    let app = app_with(plan_sheet());

    let local = app
        .clone()
        .oneshot(preflight("http://localhost:5173"))
        .await
        .unwrap();
    assert_eq!(
        local.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let remote = app
        .oneshot(preflight("https://attacker.example"))
        .await
        .unwrap();
    assert!(remote
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// INFO ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_health_and_version() {
    let app = app_with(plan_sheet());
    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");

    let (_, body) = send(app, get("/version")).await;
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (_, body) = send(app_with(plan_sheet()), get("/")).await;
    let paths: Vec<&str> = body["data"]["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert!(paths.contains(&"/api/status"));
    assert!(paths.contains(&"/api/v1/query"));
}

// ═══════════════════════════════════════════════════════════════════════════
// STATUS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_status_connected() {
    let (status, body) = send(app_with(plan_sheet()), get("/api/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["botActive"], true);
    assert_eq!(body["botError"], Value::Null);
    assert_eq!(body["googleSheetsConnected"], true);
    assert_eq!(body["spreadsheet"]["title"], "Plan 2025");
    assert_eq!(
        body["spreadsheet"]["url"],
        "https://docs.google.com/spreadsheets/d/memory"
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_status_unreachable_sheet() {
    let sheet = plan_sheet();
    sheet.set_fail_reads(true);
    let (_, body) = send(app_with(sheet), get("/api/status")).await;
    assert_eq!(body["googleSheetsConnected"], false);
    assert!(body["error"].as_str().unwrap().contains("metadata"));
    assert!(body.get("spreadsheet").is_none());
}

#[tokio::test]
async fn test_status_without_spreadsheet() {
    let app = build_router(Arc::new(AppState::new(None)));
    let (_, body) = send(app, get("/api/status")).await;
    assert_eq!(body["googleSheetsConnected"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_reported_health_shows_in_status() {
    let app = app_with(plan_sheet());
    let (_, body) = send(
        app.clone(),
        post("/api/health", json!({"active": false, "error": "polling failed"})),
    )
    .await;
    assert_eq!(body["success"], true);

    let (_, body) = send(app.clone(), get("/api/status")).await;
    assert_eq!(body["botActive"], false);
    assert_eq!(body["botError"], "polling failed");

    // Recovery keeps the last error visible
    send(app.clone(), post("/api/health", json!({"active": true}))).await;
    let (_, body) = send(app, get("/api/status")).await;
    assert_eq!(body["botActive"], true);
    assert_eq!(body["botError"], "polling failed");
}

// ═══════════════════════════════════════════════════════════════════════════
// SPREADSHEET OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_query_endpoint() {
    let (_, body) = send(
        app_with(plan_sheet()),
        post("/api/v1/query", json!({"args": "дата 10.06.2025 тип гм"})),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["total_duration"], 30.0);
    assert_eq!(body["data"]["filters"][0], "Дата: 10.06.2025");
    assert!(body["data"]["report"]
        .as_str()
        .unwrap()
        .contains("Summer Sale | 30 сек"));
}

#[tokio::test]
async fn test_query_endpoint_bad_args() {
    let (status, body) = send(
        app_with(plan_sheet()),
        post("/api/v1/query", json!({"args": "дата никогда"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("никогда"));
    assert!(body.get("retryable").is_none());
}

#[tokio::test]
async fn test_locate_endpoint() {
    let app = app_with(plan_sheet());
    let (_, body) = send(
        app.clone(),
        post("/api/v1/locate", json!({"campaign_name": "summer sale"})),
    )
    .await;
    assert_eq!(body["data"]["found"], true);
    assert_eq!(body["data"]["row"]["row_number"], 2);

    let (_, body) = send(app, post("/api/v1/locate", json!({"campaign_name": "Spring"}))).await;
    assert_eq!(body["data"]["found"], false);
}

#[tokio::test]
async fn test_highlight_endpoint() {
    use rust_xlsxwriter::Workbook;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("outlets.xlsx");
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_string(0, 0, "Summer Sale").unwrap();
    ws.write_string(0, 1, "1001").unwrap();
    ws.write_string(1, 0, "Summer Sale").unwrap();
    ws.write_string(1, 1, "9999").unwrap();
    workbook.save(&path).unwrap();

    let sheet = plan_sheet();
    let (_, body) = send(
        app_with(sheet.clone()),
        post("/api/v1/highlight", json!({"file_path": path.to_str().unwrap()})),
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["outcome"]["highlighted"], 1);
    assert_eq!(body["data"]["outcome"]["not_found"][0], "9999");
    assert_eq!(body["data"]["row"]["row_number"], 2);
    assert_eq!(sheet.highlighted_cells(), 1);
}

#[tokio::test]
async fn test_highlight_endpoint_bad_file() {
    let (_, body) = send(
        app_with(plan_sheet()),
        post("/api/v1/highlight", json!({"file_path": "/tmp/outlets.csv"})),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body.get("retryable").is_none());
}

#[tokio::test]
async fn test_remote_failure_is_retryable() {
    let sheet = plan_sheet();
    sheet.set_fail_reads(true);
    let (_, body) = send(
        app_with(sheet),
        post("/api/v1/locate", json!({"campaign_name": "Summer Sale"})),
    )
    .await;
    assert_eq!(body["success"], false);
    assert_eq!(body["retryable"], true);
    assert!(body["error"].as_str().unwrap().contains("metadata"));
}
