use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;

use crate::models::{FilterKind, LocationFilter, TargetGroup};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub sheets: SheetsConfig,
    /// Case-insensitive keywords matched as substrings of company names.
    pub competitors: Vec<String>,
    /// Target groups in run order; each maps to one worksheet.
    pub targets: Vec<TargetGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub query: String,
    pub language: String,
    pub page_size: u32,
    /// Accumulation cap per location filter. Checked after each full page,
    /// so a run may overshoot by up to one page.
    pub max_jobs_to_fetch: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub key_file: String,
    pub base_url: String,
}

const DEFAULT_QUERY: &str = "\"GCP\" OR \"Google Cloud Platform\" OR \"Google Cloud\"";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            search: SearchConfig {
                api_key: env::var("SERPAPI_API_KEY")
                    .context("SERPAPI_API_KEY must be set")?,
                base_url: env::var("SERPAPI_BASE_URL")
                    .unwrap_or_else(|_| "https://serpapi.com/search".to_string()),
                query: env::var("SEARCH_QUERY").unwrap_or_else(|_| DEFAULT_QUERY.to_string()),
                language: env::var("SEARCH_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
                page_size: env::var("RESULTS_PER_PAGE")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
                max_jobs_to_fetch: env::var("MAX_JOBS_TO_FETCH")
                    .unwrap_or_else(|_| "500".to_string())
                    .parse()?,
            },
            sheets: SheetsConfig {
                spreadsheet_id: env::var("SPREADSHEET_ID")
                    .context("SPREADSHEET_ID must be set")?,
                key_file: env::var("SERVICE_ACCOUNT_KEY_FILE")
                    .unwrap_or_else(|_| "service_account_key.json".to_string()),
                base_url: env::var("SHEETS_API_BASE_URL")
                    .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string()),
            },
            competitors: env::var("COMPETITOR_KEYWORDS")
                .unwrap_or_else(|_| "ITS".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            targets: load_targets()?,
        })
    }
}

/// Target groups come from a JSON file when `TARGETS_FILE` is set, otherwise
/// the built-in Europe/India/US groups are used. The file holds an ordered
/// array of `{ "name": ..., "filters": [{ "kind": ..., "value": ... }] }`.
fn load_targets() -> Result<Vec<TargetGroup>> {
    match env::var("TARGETS_FILE") {
        Ok(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("could not read targets file '{}'", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("could not parse targets file '{}'", path))
        }
        Err(_) => Ok(default_targets()),
    }
}

fn default_targets() -> Vec<TargetGroup> {
    let location = |value: &str| LocationFilter {
        kind: FilterKind::Location,
        value: value.to_string(),
    };

    vec![
        TargetGroup {
            name: "Europe".to_string(),
            filters: vec![
                location("United Kingdom"),
                location("Germany"),
                location("France"),
                location("Spain"),
                location("Italy"),
                location("Netherlands"),
                location("Poland"),
                location("Sweden"),
                location("Iceland"),
                location("Ireland"),
            ],
        },
        TargetGroup {
            name: "India".to_string(),
            filters: vec![location("India")],
        },
        TargetGroup {
            name: "US".to_string(),
            filters: vec![location("United States")],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_targets() {
        let targets = default_targets();

        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].name, "Europe");
        assert_eq!(targets[0].filters.len(), 10);
        assert_eq!(targets[1].name, "India");
        assert_eq!(targets[2].name, "US");
        assert!(targets
            .iter()
            .flat_map(|g| &g.filters)
            .all(|f| f.kind == FilterKind::Location));
    }

    #[test]
    fn test_targets_file_parsing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "DACH", "filters": [
                    {{"kind": "country_code", "value": "de"}},
                    {{"kind": "location", "value": "Austria"}}
                ]}}
            ]"#
        )
        .unwrap();

        let raw = fs::read_to_string(file.path()).unwrap();
        let targets: Vec<TargetGroup> = serde_json::from_str(&raw).unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "DACH");
        assert_eq!(targets[0].filters[0].kind, FilterKind::CountryCode);
        assert_eq!(targets[0].filters[0].value, "de");
        assert_eq!(targets[0].filters[1].kind, FilterKind::Location);
    }
}
