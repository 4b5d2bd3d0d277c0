//! Access tokens for the Sheets API
//!
//! An `AuthSession` is a plain value owned by the caller. Before each operation
//! the caller runs `refresh_if_expired` against a `TokenSource`; nothing here
//! caches credentials on its own.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::{SheetmarkError, SheetmarkResult};

/// Header carrying the workload identity for the connection broker
pub const CONNECTOR_IDENTITY_HEADER: &str = "X_REPLIT_TOKEN";
/// Connector name requested from the broker
pub const CONNECTOR_NAME: &str = "google-sheet";
/// Lifetime given to broker tokens that arrive without an expiry
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 300;

/// Bearer token plus its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    access_token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthSession {
    /// `expires_at: None` never expires
    pub fn new(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// A session that must be refreshed before first use
    pub fn empty() -> Self {
        Self::new(String::new(), None)
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token.is_empty() || self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Replace the session from `source` when it has expired.
    ///
    /// Returns whether a refresh happened.
    pub async fn refresh_if_expired(&mut self, source: &dyn TokenSource) -> SheetmarkResult<bool> {
        if !self.is_expired() {
            return Ok(false);
        }
        let fresh = source.fetch().await?;
        if fresh.access_token.is_empty() {
            return Err(SheetmarkError::Auth(
                "Token source returned an empty access token".to_string(),
            ));
        }
        tracing::debug!(expires_at = ?fresh.expires_at, "access token refreshed");
        *self = fresh;
        Ok(true)
    }
}

/// Where new sessions come from
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch(&self) -> SheetmarkResult<AuthSession>;
}

/// A fixed token, e.g. from `SHEETMARK_ACCESS_TOKEN`
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch(&self) -> SheetmarkResult<AuthSession> {
        if self.token.is_empty() {
            return Err(SheetmarkError::Auth("Access token is empty".to_string()));
        }
        Ok(AuthSession::new(self.token.clone(), None))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConnectionList {
    #[serde(default)]
    items: Vec<Connection>,
}

#[derive(Debug, Default, Deserialize)]
struct Connection {
    #[serde(default)]
    settings: ConnectionSettings,
}

#[derive(Debug, Default, Deserialize)]
struct ConnectionSettings {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
    #[serde(default)]
    oauth: Option<OAuthSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct OAuthSettings {
    #[serde(default)]
    credentials: Option<OAuthCredentials>,
}

#[derive(Debug, Default, Deserialize)]
struct OAuthCredentials {
    #[serde(default)]
    access_token: Option<String>,
}

impl ConnectionSettings {
    fn into_session(self, now: DateTime<Utc>) -> SheetmarkResult<AuthSession> {
        let token = self
            .access_token
            .filter(|t| !t.is_empty())
            .or_else(|| {
                self.oauth
                    .and_then(|o| o.credentials)
                    .and_then(|c| c.access_token)
                    .filter(|t| !t.is_empty())
            })
            .ok_or_else(|| SheetmarkError::Auth("Google Sheet not connected".to_string()))?;

        let expires_at = self
            .expires_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| now + Duration::seconds(DEFAULT_TOKEN_TTL_SECS));

        Ok(AuthSession::new(token, Some(expires_at)))
    }
}

/// OAuth token held by a connection broker and fetched over HTTP
pub struct ConnectorTokenSource {
    http: reqwest::Client,
    url: String,
    identity: String,
}

impl ConnectorTokenSource {
    /// `hostname` of the broker and the identity sent in `X_REPLIT_TOKEN`
    pub fn new(http: reqwest::Client, hostname: &str, identity: impl Into<String>) -> Self {
        let base = if hostname.starts_with("http://") || hostname.starts_with("https://") {
            hostname.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", hostname.trim_end_matches('/'))
        };
        Self {
            http,
            url: format!(
                "{}/api/v2/connection?include_secrets=true&connector_names={}",
                base, CONNECTOR_NAME
            ),
            identity: identity.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenSource for ConnectorTokenSource {
    async fn fetch(&self) -> SheetmarkResult<AuthSession> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(CONNECTOR_IDENTITY_HEADER, &self.identity)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetmarkError::Auth(format!(
                "Connection broker returned HTTP {}",
                response.status()
            )));
        }

        let list: ConnectionList = response.json().await?;
        let connection = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| SheetmarkError::Auth("Google Sheet not connected".to_string()))?;
        connection.settings.into_session(Utc::now())
    }
}
