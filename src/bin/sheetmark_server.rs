//! Sheetmark API Server binary
//!
//! HTTP API over one campaign plan spreadsheet.

use clap::Parser;
use sheetmark::api::{run_api_server, ApiConfig, AppState, SheetConnection};
use sheetmark::config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetmark-server")]
#[command(version)]
#[command(about = "Sheetmark API Server - HTTP API for campaign outlet highlighting")]
#[command(long_about = r#"
Sheetmark API Server

Endpoints:
  - GET  /api/status        - Transport health and spreadsheet reachability
  - POST /api/health        - Report transport health
  - POST /api/v1/query      - Total video duration for filters
  - POST /api/v1/locate     - Find a campaign row
  - POST /api/v1/highlight  - Highlight outlets from an Excel file

Additional endpoints:
  - GET  /health            - Health check
  - GET  /version           - Server version info
  - GET  /                  - API documentation

Example usage:
  sheetmark-server --spreadsheet-id 1AbC... --port 3000

  curl -X POST http://localhost:8080/api/v1/query \
    -H "Content-Type: application/json" \
    -d '{"args": "дата 25.12.2024 тип ГМ"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "SHEETMARK_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "SHEETMARK_PORT")]
    port: u16,

    /// YAML config file
    #[arg(short, long, env = "SHEETMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Spreadsheet id (overrides the config file)
    #[arg(long, env = "SHEETMARK_SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Bearer token for the Sheets API (overrides the config file)
    #[arg(long, env = "SHEETMARK_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Connection broker host used when no access token is given
    #[arg(long, env = "REPLIT_CONNECTORS_HOSTNAME")]
    connector_hostname: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if args.spreadsheet_id.is_some() {
        config.spreadsheet_id = args.spreadsheet_id;
    }
    if args.access_token.is_some() {
        config.access_token = args.access_token;
    }
    if args.connector_hostname.is_some() {
        config.connector_hostname = args.connector_hostname;
    }

    // Status stays available without a spreadsheet; it reports the error
    let sheet = match config.connect() {
        Ok((service, tokens)) => Some(SheetConnection::new(service, tokens)),
        Err(e) => {
            eprintln!("warning: spreadsheet not connected: {}", e);
            None
        }
    };

    let api = ApiConfig {
        host: args.host,
        port: args.port,
    };

    run_api_server(api, AppState::new(sheet)).await
}
