use std::fmt;

use crate::config::Config;
use crate::search::serpapi::RawJob;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

/// Placeholder for optional listing fields the search API left out.
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description provided";

/// Canonical job listing, immutable once constructed. `job_id` is the sole
/// deduplication key; records with an empty `job_id` are never written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JobRecord {
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub compensation: String,
    pub description: String,
    pub source_url: String,
    pub apply_link: String,
}

impl JobRecord {
    /// Normalize one raw search API entry. Never fails: every missing field
    /// degrades to its documented default.
    pub fn from_raw(raw: RawJob) -> Self {
        let source_url = raw
            .share_link
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let apply_link = raw
            .apply_options
            .unwrap_or_default()
            .into_iter()
            .find_map(|option| option.link)
            .unwrap_or_else(|| source_url.clone());

        Self {
            job_id: raw.job_id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            company_name: raw.company_name.unwrap_or_default(),
            location: raw.location.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            compensation: raw
                .detected_extensions
                .and_then(|ext| ext.salary)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            description: raw
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            source_url,
            apply_link,
        }
    }

    /// Row values in the worksheet column order (see sheets::COLUMNS).
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.job_id.clone(),
            self.title.clone(),
            self.company_name.clone(),
            self.source_url.clone(),
            self.location.clone(),
            self.compensation.clone(),
            self.description.clone(),
            self.apply_link.clone(),
        ]
    }
}

/// One query constraint for a paginated fetch pass. `CountryCode` maps to
/// the `gl` parameter, `Location` to the free-text `location` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    CountryCode,
    Location,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LocationFilter {
    pub kind: FilterKind,
    pub value: String,
}

/// A named destination: one worksheet plus the location filters feeding it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TargetGroup {
    pub name: String,
    pub filters: Vec<LocationFilter>,
}

// Run reporting

#[derive(Debug, Clone, serde::Serialize)]
pub struct GroupReport {
    pub group: String,
    pub fetched: usize,
    pub kept: usize,
    pub written: usize,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunSummary {
    pub groups: Vec<GroupReport>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SUCCESS: Agent run complete.")?;
        for report in &self.groups {
            write!(
                f,
                " [{}] fetched {} raw jobs, found {} non-competitors, added {} new unique jobs.",
                report.group, report.fetched, report.kept, report.written
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
