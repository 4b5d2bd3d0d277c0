//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::server::{AppState, SheetConnection};
use crate::cli::query_args::{describe, QueryArgParser};
use crate::cli::report;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::excel::reader;
use crate::service::ProcessReport;
use crate::types::{CampaignRow, QueryResult, SpreadsheetInfo};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the spreadsheet or its credentials failed; the same request may succeed later
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
            retryable: false,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
            retryable: false,
        }
    }

    fn from_result(result: SheetmarkResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) if e.is_transient() => {
                tracing::error!(error = %e, "spreadsheet unavailable");
                Self {
                    retryable: true,
                    ..Self::err(e.to_string())
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "request failed");
                Self::err(e.to_string())
            }
        }
    }
}

fn connection(state: &AppState) -> SheetmarkResult<&SheetConnection> {
    state.sheet.as_ref().ok_or_else(|| {
        SheetmarkError::InvalidInput("No spreadsheet is configured on this server".to_string())
    })
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(path: &str, method: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Sheetmark API Server".to_string(),
        version: state.version.clone(),
        description: "Campaign outlet highlighting and video duration queries".to_string(),
        endpoints: vec![
            endpoint("/health", "GET", "Health check endpoint"),
            endpoint("/version", "GET", "Get server version"),
            endpoint("/api/status", "GET", "Transport and spreadsheet status"),
            endpoint("/api/health", "POST", "Report transport health"),
            endpoint("/api/v1/query", "POST", "Total video duration for filters"),
            endpoint("/api/v1/locate", "POST", "Find a campaign row"),
            endpoint("/api/v1/highlight", "POST", "Highlight outlets from an Excel file"),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "status".to_string(),
            "query".to_string(),
            "locate".to_string(),
            "highlight".to_string(),
        ],
    }))
}

/// Dashboard status, unwrapped
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub bot_active: bool,
    pub bot_error: Option<String>,
    pub google_sheets_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet: Option<SpreadsheetInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn spreadsheet_info(state: &AppState) -> SheetmarkResult<SpreadsheetInfo> {
    let conn = connection(state)?;
    let session = conn.session().await?;
    conn.service.spreadsheet_info(&session).await
}

/// GET /api/status - Transport health and spreadsheet reachability
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health.read().await.clone();
    let (spreadsheet, error) = match spreadsheet_info(&state).await {
        Ok(info) => (Some(info), None),
        Err(e) => {
            tracing::warn!(error = %e, "spreadsheet unreachable");
            (None, Some(e.to_string()))
        }
    };

    Json(StatusResponse {
        bot_active: health.transport_active,
        bot_error: health.last_error,
        google_sheets_connected: spreadsheet.is_some(),
        spreadsheet,
        error,
    })
}

/// Health report from the chat transport
#[derive(Deserialize)]
pub struct HealthReport {
    pub active: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// POST /api/health - Record transport health
pub async fn report_health(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HealthReport>,
) -> impl IntoResponse {
    let mut health = state.health.write().await;
    health.transport_active = req.active;
    // An error stays visible until a new one replaces it
    if req.error.is_some() {
        health.last_error = req.error;
    }
    Json(ApiResponse::ok(health.transport_active))
}

/// Query request: the same free text the chat command takes
#[derive(Deserialize)]
pub struct QueryRequest {
    pub args: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub filters: Vec<String>,
    #[serde(flatten)]
    pub result: QueryResult,
    pub report: String,
}

/// POST /api/v1/query - Total video duration
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> impl IntoResponse {
    let result = async {
        let filter = QueryArgParser::new()?.parse(&req.args)?;
        let conn = connection(&state)?;
        let session = conn.session().await?;
        let result = conn.service.query_video_duration(&session, &filter).await?;
        let filters = describe(&filter);
        let report = report::render_query(&filters, &result);
        Ok::<_, SheetmarkError>(QueryResponse {
            filters,
            result,
            report,
        })
    }
    .await;
    Json(ApiResponse::from_result(result))
}

#[derive(Deserialize)]
pub struct LocateRequest {
    pub campaign_name: String,
}

#[derive(Serialize)]
pub struct LocateResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<CampaignRow>,
}

/// POST /api/v1/locate - Find a campaign row
pub async fn locate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocateRequest>,
) -> impl IntoResponse {
    let result = async {
        let conn = connection(&state)?;
        let session = conn.session().await?;
        let row = conn
            .service
            .find_campaign_row(&session, &req.campaign_name)
            .await?;
        Ok::<_, SheetmarkError>(LocateResponse {
            found: row.is_some(),
            row,
        })
    }
    .await;
    Json(ApiResponse::from_result(result))
}

#[derive(Deserialize)]
pub struct HighlightRequest {
    pub file_path: String,
}

#[derive(Serialize)]
pub struct HighlightResponse {
    #[serde(flatten)]
    pub report: ProcessReport,
    pub message: String,
}

/// POST /api/v1/highlight - Highlight the outlets listed in an Excel file
pub async fn highlight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HighlightRequest>,
) -> impl IntoResponse {
    let result = async {
        let path = PathBuf::from(&req.file_path);
        let table = reader::read_first_sheet(&path)?;
        let conn = connection(&state)?;
        let session = conn.session().await?;
        let report = conn.service.process_table(&session, &table).await?;
        let message = report::render_process(&report);
        Ok::<_, SheetmarkError>(HighlightResponse { report, message })
    }
    .await;
    Json(ApiResponse::from_result(result))
}
