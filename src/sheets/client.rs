use std::collections::HashSet;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::SheetsConfig;
use crate::models::JobRecord;
use crate::sheets::auth::{ServiceAccountKey, TokenProvider};

/// Worksheet header labels in column order. Labels and order are a
/// compatibility contract with downstream consumers of the sheet; the
/// dedup read always targets column 1.
pub const COLUMNS: [&str; 8] = [
    "job_id",
    "Title",
    "Company Name",
    "Source URL",
    "Location of Job",
    "Compensation",
    "Job Description",
    "Apply Link",
];

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("could not read service account key file '{path}': {message}")]
    KeyFile { path: String, message: String },

    #[error("could not sign access token assertion: {0}")]
    Credentials(#[source] jsonwebtoken::errors::Error),

    #[error("token exchange failed ({status}): {body}")]
    TokenExchange { status: StatusCode, body: String },

    #[error("sheets request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("sheets API returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

enum Auth {
    ServiceAccount(Box<TokenProvider>),
    Static(String),
}

pub struct SheetsClient {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    auth: Auth,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    /// Build a client from the configured service-account key file. Fails
    /// when the key file is missing or malformed; the trigger surfaces
    /// that as an initialization error.
    pub fn from_key_file(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::from_file(&config.key_file)?;
        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            auth: Auth::ServiceAccount(Box::new(TokenProvider::new(key))),
        })
    }

    /// Build a client around a pre-issued bearer token. Used by tests and
    /// by deployments that terminate auth outside the process.
    pub fn with_static_token(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            auth: Auth::Static(token.into()),
        }
    }

    async fn bearer(&self) -> Result<String, SheetsError> {
        match &self.auth {
            Auth::ServiceAccount(provider) => provider.access_token().await,
            Auth::Static(token) => Ok(token.clone()),
        }
    }

    /// Read every `job_id` already present in a worksheet (column 1, header
    /// row excluded). The caller treats a failure here as recoverable.
    pub async fn existing_job_ids(&self, worksheet: &str) -> Result<HashSet<String>, SheetsError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A2:A",
            self.base_url, self.spreadsheet_id, worksheet
        );

        let response = self
            .client
            .get(&url)
            .query(&[("majorDimension", "COLUMNS")])
            .bearer_auth(self.bearer().await?)
            .send()
            .await
            .map_err(SheetsError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api { status, body });
        }

        let range: ValueRange = response.json().await.map_err(SheetsError::Request)?;
        let ids: HashSet<String> = range
            .values
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .filter(|id| !id.is_empty())
            .collect();

        info!(worksheet, count = ids.len(), "read existing job ids from the sheet");
        Ok(ids)
    }

    /// Append the records as rows at the logical end of the worksheet in
    /// one bulk call. Values are written with type coercion enabled
    /// (`USER_ENTERED`). Returns the number of rows written; an empty
    /// input short-circuits to 0 without touching the store.
    pub async fn append_records(
        &self,
        worksheet: &str,
        records: &[JobRecord],
    ) -> Result<usize, SheetsError> {
        if records.is_empty() {
            return Ok(0);
        }

        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A1:append",
            self.base_url, self.spreadsheet_id, worksheet
        );
        let body = AppendRequest {
            values: records.iter().map(JobRecord::to_row).collect(),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(self.bearer().await?)
            .json(&body)
            .send()
            .await
            .map_err(SheetsError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api { status, body });
        }

        info!(worksheet, rows = records.len(), "appended new rows to the sheet");
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn record(id: &str) -> JobRecord {
        JobRecord {
            job_id: id.to_string(),
            title: "Cloud Engineer".to_string(),
            company_name: "Acme Corp".to_string(),
            location: "Berlin, Germany".to_string(),
            compensation: "N/A".to_string(),
            description: "No description provided".to_string(),
            source_url: "https://jobs.example.com".to_string(),
            apply_link: "https://apply.example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_existing_job_ids_reads_first_column() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v4/spreadsheets/sheet-1/values/Europe!A2:A")
            .match_query(Matcher::UrlEncoded("majorDimension".into(), "COLUMNS".into()))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "range": "Europe!A2:A4",
                    "majorDimension": "COLUMNS",
                    "values": [["id-1", "id-2", "id-3"]],
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = SheetsClient::with_static_token(server.url(), "sheet-1", "test-token");
        let ids = client.existing_job_ids("Europe").await.unwrap();

        assert_eq!(ids.len(), 3);
        assert!(ids.contains("id-2"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_existing_job_ids_empty_worksheet() {
        let mut server = mockito::Server::new_async().await;
        // A worksheet with only a header row returns no "values" key at all.
        server
            .mock("GET", "/v4/spreadsheets/sheet-1/values/US!A2:A")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "range": "US!A2:A", "majorDimension": "COLUMNS" }).to_string())
            .create_async()
            .await;

        let client = SheetsClient::with_static_token(server.url(), "sheet-1", "test-token");
        let ids = client.existing_job_ids("US").await.unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_existing_job_ids_read_failure_surfaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v4/spreadsheets/sheet-1/values/Europe!A2:A")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("permission denied")
            .create_async()
            .await;

        let client = SheetsClient::with_static_token(server.url(), "sheet-1", "test-token");
        let error = client.existing_job_ids("Europe").await.unwrap_err();

        match error {
            SheetsError::Api { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "permission denied");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_append_is_a_noop_for_empty_input() {
        // No server at all: any HTTP call would fail the test.
        let client = SheetsClient::with_static_token("http://127.0.0.1:1", "sheet-1", "test-token");
        let written = client.append_records("Europe", &[]).await.unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_append_writes_rows_in_column_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v4/spreadsheets/sheet-1/values/Europe!A1:append")
            .match_query(Matcher::UrlEncoded(
                "valueInputOption".into(),
                "USER_ENTERED".into(),
            ))
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJson(json!({
                "values": [[
                    "id-1",
                    "Cloud Engineer",
                    "Acme Corp",
                    "https://jobs.example.com",
                    "Berlin, Germany",
                    "N/A",
                    "No description provided",
                    "https://apply.example.com",
                ]],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "updates": { "updatedRows": 1 } }).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = SheetsClient::with_static_token(server.url(), "sheet-1", "test-token");
        let written = client.append_records("Europe", &[record("id-1")]).await.unwrap();

        assert_eq!(written, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_append_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v4/spreadsheets/sheet-1/values/Europe!A1:append")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("backend error")
            .create_async()
            .await;

        let client = SheetsClient::with_static_token(server.url(), "sheet-1", "test-token");
        let error = client
            .append_records("Europe", &[record("id-1")])
            .await
            .unwrap_err();

        assert!(matches!(error, SheetsError::Api { .. }));
    }

    #[test]
    fn test_column_contract() {
        assert_eq!(
            COLUMNS,
            [
                "job_id",
                "Title",
                "Company Name",
                "Source URL",
                "Location of Job",
                "Compensation",
                "Job Description",
                "Apply Link",
            ]
        );
    }
}
