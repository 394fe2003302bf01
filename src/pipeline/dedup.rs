use std::collections::HashSet;

use tracing::info;

use crate::models::JobRecord;

/// Keep only records that are genuinely new: a non-empty `job_id` that is
/// neither already recorded in the worksheet nor repeated earlier in this
/// batch (first occurrence wins). Order is preserved. Records without an
/// id are not deduplicable and are dropped here, counted neither as
/// duplicates nor as new.
pub fn dedup_new_records(records: Vec<JobRecord>, existing: &HashSet<String>) -> Vec<JobRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let fresh: Vec<JobRecord> = records
        .into_iter()
        .filter(|record| {
            !record.job_id.is_empty()
                && !existing.contains(&record.job_id)
                && seen.insert(record.job_id.clone())
        })
        .collect();

    info!(new = fresh.len(), "deduplication complete, truly new jobs found");
    fresh
}
