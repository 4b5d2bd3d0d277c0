//! Runtime configuration
//!
//! Values come from an optional YAML file; command-line flags and
//! `SHEETMARK_*` variables override them in the binaries.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::core::columns::{OutletRange, OUTLET_END_COLUMN, OUTLET_START_COLUMN};
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::service::CampaignSheet;
use crate::sheets::google::{http_client, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::sheets::{ConnectorTokenSource, GoogleSheetsClient, StaticToken, TokenSource};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub spreadsheet_id: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
    pub outlet_start: String,
    pub outlet_end: String,
    /// Fixed bearer token; takes precedence over the connection broker
    pub access_token: Option<String>,
    pub connector_hostname: Option<String>,
    pub connector_identity: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            outlet_start: OUTLET_START_COLUMN.to_string(),
            outlet_end: OUTLET_END_COLUMN.to_string(),
            access_token: None,
            connector_hostname: None,
            connector_identity: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> SheetmarkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> SheetmarkResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> SheetmarkResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn outlet_range(&self) -> SheetmarkResult<OutletRange> {
        OutletRange::from_letters(&self.outlet_start, &self.outlet_end)
    }

    pub fn spreadsheet_id(&self) -> SheetmarkResult<&str> {
        self.spreadsheet_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                SheetmarkError::InvalidInput(
                    "Spreadsheet id is not configured (set SHEETMARK_SPREADSHEET_ID)".to_string(),
                )
            })
    }

    /// Static token if configured, else the connection broker
    pub fn token_source(&self, http: &reqwest::Client) -> SheetmarkResult<Arc<dyn TokenSource>> {
        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Arc::new(StaticToken::new(token)));
        }

        let hostname = self.connector_hostname.as_deref().ok_or_else(|| {
            SheetmarkError::Auth(
                "No access token and no connection broker configured".to_string(),
            )
        })?;
        let identity = self
            .connector_identity
            .clone()
            .or_else(identity_from_env)
            .ok_or_else(|| SheetmarkError::Auth("No connector identity available".to_string()))?;

        Ok(Arc::new(ConnectorTokenSource::new(
            http.clone(),
            hostname,
            identity,
        )))
    }

    /// Service over the Google Sheets backend plus the token source feeding it
    pub fn connect(&self) -> SheetmarkResult<(CampaignSheet, Arc<dyn TokenSource>)> {
        let http = http_client(self.timeout_secs)?;
        let backend = GoogleSheetsClient::new(http.clone(), &self.api_base, self.spreadsheet_id()?)?;
        let service = CampaignSheet::with_range(Arc::new(backend), self.outlet_range()?);
        let tokens = self.token_source(&http)?;
        Ok((service, tokens))
    }
}

/// Broker identity from the hosting environment: `repl <id>` or `depl <renewal>`
pub fn identity_from_env() -> Option<String> {
    identity_from(
        std::env::var("REPL_IDENTITY").ok(),
        std::env::var("WEB_REPL_RENEWAL").ok(),
    )
}

fn identity_from(repl: Option<String>, renewal: Option<String>) -> Option<String> {
    match (repl.filter(|v| !v.is_empty()), renewal.filter(|v| !v.is_empty())) {
        (Some(id), _) => Some(format!("repl {}", id)),
        (None, Some(renewal)) => Some(format!("depl {}", renewal)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base, "https://sheets.googleapis.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.outlet_range().unwrap(), OutletRange::STANDARD);
        assert!(config.spreadsheet_id().is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("spreadsheet_id: abc\noutlet_end: Z\n").unwrap();
        assert_eq!(config.spreadsheet_id().unwrap(), "abc");
        assert_eq!(config.outlet_start, "R");
        assert_eq!(config.outlet_range().unwrap().end, 25);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            Config::from_yaml("timeout_secs: [1, 2"),
            Err(SheetmarkError::Yaml(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access_token: secret").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.access_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_token_source_requires_credentials() {
        let config = Config::default();
        let http = reqwest::Client::new();
        assert!(config.token_source(&http).is_err());

        let config = Config {
            access_token: Some("t".to_string()),
            ..Config::default()
        };
        assert!(config.token_source(&http).is_ok());
    }

    #[test]
    fn test_identity_from_env_values() {
        assert_eq!(identity_from(Some("x".into()), Some("y".into())).as_deref(), Some("repl x"));
        assert_eq!(identity_from(None, Some("y".into())).as_deref(), Some("depl y"));
        assert_eq!(identity_from(Some(String::new()), None), None);
    }
}
