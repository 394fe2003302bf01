use tracing::info;

use crate::models::JobRecord;

/// Drop records whose company name contains any blocklist keyword,
/// case-insensitively and as a substring. The first matching keyword wins;
/// input order is preserved.
pub fn filter_competitors(records: Vec<JobRecord>, keywords: &[String]) -> Vec<JobRecord> {
    let folded: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        let company = record.company_name.to_lowercase();
        match folded.iter().find(|keyword| company.contains(keyword.as_str())) {
            Some(keyword) => info!(
                title = %record.title,
                company = %record.company_name,
                keyword = %keyword,
                "removed competitor listing"
            ),
            None => kept.push(record),
        }
    }

    info!(kept = kept.len(), "competitor filtering complete");
    kept
}
