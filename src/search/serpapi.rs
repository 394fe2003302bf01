//! SerpAPI Google Jobs client
//!
//! Thin typed client over the `google_jobs` engine. Pagination is driven by
//! the opaque `serpapi_pagination.next_page_token` cursor; a fetch pass for
//! one location filter keeps requesting pages until one of three stop
//! conditions holds:
//!
//! 1. A page comes back with zero result entries (end of results).
//! 2. The accumulated record count reaches the configured cap. The cap is
//!    checked only after a full page is appended, so the final count may
//!    exceed the cap by up to one page size.
//! 3. The response carries no next-page token (pagination exhausted).
//!
//! Any transport failure or non-success response is fatal for the whole
//! run: no retries, no backoff. Errors carry the offending cursor token.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::models::{FilterKind, JobRecord, LocationFilter};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed (page token {token:?}): {source}")]
    Request {
        token: Option<String>,
        #[source]
        source: reqwest::Error,
    },

    #[error("search API returned {status} (page token {token:?}): {body}")]
    Api {
        status: StatusCode,
        token: Option<String>,
        body: String,
    },

    #[error("failed to decode search response (page token {token:?}): {source}")]
    Decode {
        token: Option<String>,
        #[source]
        source: reqwest::Error,
    },
}

/// Raw job entry as returned by the search API. Every field is optional;
/// normalization into a `JobRecord` applies the documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub share_link: Option<String>,
    pub detected_extensions: Option<DetectedExtensions>,
    pub apply_options: Option<Vec<ApplyOption>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedExtensions {
    pub salary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyOption {
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    jobs_results: Vec<RawJob>,
    serpapi_pagination: Option<SerpApiPagination>,
}

#[derive(Debug, Deserialize)]
struct SerpApiPagination {
    next_page_token: Option<String>,
}

pub struct JobSearchClient {
    client: Client,
    config: SearchConfig,
}

impl JobSearchClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Run one full pagination pass for a location filter and return the
    /// accumulated normalized records.
    pub async fn fetch_jobs(&self, filter: &LocationFilter) -> Result<Vec<JobRecord>, SearchError> {
        info!(filter = %filter.value, "fetching job listings");

        let mut accumulated: Vec<JobRecord> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(filter, page_token.as_deref()).await?;

            if page.jobs_results.is_empty() {
                debug!("no more results found in the latest fetch");
                break;
            }

            accumulated.extend(page.jobs_results.into_iter().map(JobRecord::from_raw));

            if accumulated.len() >= self.config.max_jobs_to_fetch {
                info!(
                    cap = self.config.max_jobs_to_fetch,
                    accumulated = accumulated.len(),
                    "reached maximum job limit, stopping pagination"
                );
                break;
            }

            match page
                .serpapi_pagination
                .and_then(|pagination| pagination.next_page_token)
            {
                Some(token) => page_token = Some(token),
                None => {
                    debug!("pagination complete, no next page token found");
                    break;
                }
            }
        }

        info!(filter = %filter.value, count = accumulated.len(), "fetch pass complete");
        Ok(accumulated)
    }

    async fn fetch_page(
        &self,
        filter: &LocationFilter,
        page_token: Option<&str>,
    ) -> Result<SearchResponse, SearchError> {
        let mut params: Vec<(&str, String)> = vec![
            ("engine", "google_jobs".to_string()),
            ("q", self.config.query.clone()),
            ("api_key", self.config.api_key.clone()),
            ("hl", self.config.language.clone()),
            ("num", self.config.page_size.to_string()),
        ];

        match filter.kind {
            FilterKind::CountryCode => params.push(("gl", filter.value.clone())),
            FilterKind::Location => params.push(("location", filter.value.clone())),
        }

        if let Some(token) = page_token {
            params.push(("next_page_token", token.to_string()));
        }

        let token = page_token.map(str::to_string);

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|source| SearchError::Request {
                token: token.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status,
                token,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| SearchError::Decode { token, source })
    }
}
