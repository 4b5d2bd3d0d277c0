//! Google Sheets v4 REST client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::auth::AuthSession;
use super::schema::{BatchUpdateRequest, ErrorResponse, Spreadsheet, ValueRange};
use super::{SheetTab, SheetsBackend, SpreadsheetMeta};
use crate::core::columns::A1Range;
use crate::error::{SheetmarkError, SheetmarkResult};
use crate::types::FormatRequest;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client shared by the Sheets client and the token broker
pub fn http_client(timeout_secs: u64) -> SheetmarkResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

pub struct GoogleSheetsClient {
    http: Client,
    base: Url,
    spreadsheet_id: String,
}

impl GoogleSheetsClient {
    pub fn new(http: Client, api_base: &str, spreadsheet_id: impl Into<String>) -> SheetmarkResult<Self> {
        let base = Url::parse(api_base).map_err(|e| {
            SheetmarkError::InvalidInput(format!("Invalid API base URL '{}': {}", api_base, e))
        })?;
        let spreadsheet_id = spreadsheet_id.into();
        if spreadsheet_id.trim().is_empty() {
            return Err(SheetmarkError::InvalidInput(
                "Spreadsheet id is empty".to_string(),
            ));
        }
        Ok(Self {
            http,
            base,
            spreadsheet_id,
        })
    }

    fn endpoint(&self, tail: &[&str]) -> SheetmarkResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SheetmarkError::InvalidInput(format!("API base '{}' cannot take a path", self.base))
            })?;
            segments.pop_if_empty().extend(["v4", "spreadsheets"]);
            segments.extend(tail);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> SheetmarkResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SheetmarkError::Remote(format!("HTTP {}: {}", status, message)));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SheetsBackend for GoogleSheetsClient {
    fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    async fn metadata(&self, session: &AuthSession) -> SheetmarkResult<SpreadsheetMeta> {
        let url = self.endpoint(&[&self.spreadsheet_id])?;
        let request = self
            .http
            .get(url)
            .bearer_auth(session.access_token())
            .query(&[("fields", "properties.title,sheets.properties(sheetId,title)")]);
        let spreadsheet: Spreadsheet = self.send(request).await?;

        let title = spreadsheet
            .properties
            .and_then(|p| p.title)
            .unwrap_or_else(|| "Unknown".to_string());
        let tabs = spreadsheet
            .sheets
            .into_iter()
            .filter_map(|s| s.properties)
            .map(|p| SheetTab {
                sheet_id: p.sheet_id.unwrap_or(0),
                title: p.title.unwrap_or_else(|| "Sheet1".to_string()),
            })
            .collect();

        Ok(SpreadsheetMeta { title, tabs })
    }

    async fn read_range(
        &self,
        session: &AuthSession,
        range: &A1Range,
    ) -> SheetmarkResult<Vec<Vec<String>>> {
        let range_text = range.to_string();
        let url = self.endpoint(&[&self.spreadsheet_id, "values", &range_text])?;
        tracing::debug!(range = %range_text, "reading range");
        let request = self
            .http
            .get(url)
            .bearer_auth(session.access_token())
            .query(&[
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("majorDimension", "ROWS"),
            ]);
        let values: ValueRange = self.send(request).await?;
        Ok(values.into_rows())
    }

    async fn batch_format(
        &self,
        session: &AuthSession,
        requests: &[FormatRequest],
    ) -> SheetmarkResult<()> {
        let target = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.endpoint(&[&target])?;
        let body = BatchUpdateRequest::from_formats(requests);
        let request = self
            .http
            .post(url)
            .bearer_auth(session.access_token())
            .json(&body);
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GoogleSheetsClient {
        GoogleSheetsClient::new(Client::new(), base, "sheet123").unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let c = client("https://sheets.googleapis.com");
        let url = c.endpoint(&["sheet123"]).unwrap();
        assert_eq!(url.as_str(), "https://sheets.googleapis.com/v4/spreadsheets/sheet123");

        let url = c.endpoint(&["sheet123:batchUpdate"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet123:batchUpdate"
        );
    }

    #[test]
    fn test_range_is_percent_encoded() {
        let c = client("http://localhost:9999/");
        let range = A1Range::columns("My Plan", 0, 0).to_string();
        let url = c.endpoint(&["sheet123", "values", &range]).unwrap();
        assert!(url.path().starts_with("/v4/spreadsheets/sheet123/values/"));
        assert!(url.path().contains("My%20Plan"));
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(GoogleSheetsClient::new(Client::new(), "not a url", "x").is_err());
        assert!(GoogleSheetsClient::new(Client::new(), DEFAULT_API_BASE, " ").is_err());
    }
}
