//! Sheetmark API Server implementation
//!
//! HTTP API over one connected spreadsheet: status for the dashboard, plus
//! query, locate and highlight for chat transports and scripts.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{request::Parts, HeaderValue},
    routing::{get, post},
    Router,
};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::error::SheetmarkResult;
use crate::service::CampaignSheet;
use crate::sheets::{AuthSession, TokenSource};

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Liveness of the chat transport, as last reported by it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthState {
    pub transport_active: bool,
    pub last_error: Option<String>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            transport_active: true,
            last_error: None,
        }
    }
}

/// Spreadsheet service plus the credentials it runs under
pub struct SheetConnection {
    pub service: CampaignSheet,
    tokens: Arc<dyn TokenSource>,
    session: Mutex<AuthSession>,
}

impl SheetConnection {
    pub fn new(service: CampaignSheet, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            service,
            tokens,
            session: Mutex::new(AuthSession::empty()),
        }
    }

    /// Current session, refreshed first if it has expired
    pub async fn session(&self) -> SheetmarkResult<AuthSession> {
        let mut session = self.session.lock().await;
        session.refresh_if_expired(self.tokens.as_ref()).await?;
        Ok(session.clone())
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    /// `None` when the server runs without a spreadsheet configured
    pub sheet: Option<SheetConnection>,
    pub health: RwLock<HealthState>,
}

impl AppState {
    pub fn new(sheet: Option<SheetConnection>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            sheet,
            health: RwLock::new(HealthState::default()),
        }
    }
}

/// True for browser origins served from this machine.
///
/// `/api/v1/highlight` reads files from the server's disk and writes to the
/// shared sheet, so cross-origin pages elsewhere must not drive it.
pub fn is_local_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let host = if rest.starts_with('[') {
        match rest.find(']') {
            Some(end) => &rest[..=end],
            None => return false,
        }
    } else {
        rest.split(':').next().unwrap_or_default()
    };
    let port_ok = match &rest[host.len()..] {
        "" => true,
        suffix => suffix
            .strip_prefix(':')
            .is_some_and(|port| port.parse::<u16>().is_ok()),
    };
    port_ok && matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}

pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS: local origins only
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().map(is_local_origin).unwrap_or(false)
            },
        ))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Dashboard status and transport reports
        .route("/api/status", get(handlers::status))
        .route("/api/health", post(handlers::report_health))
        // Spreadsheet operations
        .route("/api/v1/query", post(handlers::query))
        .route("/api/v1/locate", post(handlers::locate))
        .route("/api/v1/highlight", post(handlers::highlight))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, state: AppState) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetmark=info,tower_http=info".into()),
        )
        .init();

    if state.sheet.is_none() {
        tracing::warn!("no spreadsheet configured; spreadsheet endpoints will fail");
    }
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 Sheetmark API Server starting on http://{}", addr);
    info!("   Endpoints: /api/status, /api/v1/query, /api/v1/locate, /api/v1/highlight");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Sheetmark API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
