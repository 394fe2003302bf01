//! Run orchestration
//!
//! Drives the fetch -> filter -> dedup -> write pipeline once per target
//! group, in configured order, and accumulates the per-group counts into a
//! `RunSummary`. Fetch and write failures abort the whole run with the
//! failing group attached; completed groups are never rolled back. A
//! failure to read the existing-id set is recovered locally by treating
//! the worksheet as empty.

pub mod dedup;
pub mod filter;

use std::collections::HashSet;

use tracing::{info, warn};

use crate::config::Config;
use crate::models::{GroupReport, JobRecord, RunSummary};
use crate::search::JobSearchClient;
use crate::sheets::SheetsClient;
use crate::types::{AppError, AppResult};

pub use dedup::dedup_new_records;
pub use filter::filter_competitors;

pub async fn run(
    config: &Config,
    search: &JobSearchClient,
    sheets: &SheetsClient,
) -> AppResult<RunSummary> {
    let mut summary = RunSummary::default();

    for group in &config.targets {
        info!(group = %group.name, "processing target group");

        let mut raw: Vec<JobRecord> = Vec::new();
        for filter in &group.filters {
            let jobs = search
                .fetch_jobs(filter)
                .await
                .map_err(|source| AppError::Fetch {
                    group: group.name.clone(),
                    source,
                })?;
            raw.extend(jobs);
        }
        let fetched = raw.len();
        info!(group = %group.name, fetched, "fetched raw job listings");

        let kept_records = filter_competitors(raw, &config.competitors);
        let kept = kept_records.len();

        let existing = match sheets.existing_job_ids(&group.name).await {
            Ok(ids) => ids,
            Err(error) => {
                warn!(
                    group = %group.name,
                    %error,
                    "could not read existing job ids, starting with an empty set"
                );
                HashSet::new()
            }
        };

        let fresh = dedup_new_records(kept_records, &existing);
        let written = sheets
            .append_records(&group.name, &fresh)
            .await
            .map_err(|source| AppError::Write {
                group: group.name.clone(),
                source,
            })?;

        summary.groups.push(GroupReport {
            group: group.name.clone(),
            fetched,
            kept,
            written,
        });
    }

    Ok(summary)
}
