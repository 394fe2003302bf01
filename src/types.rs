// Shared result types for the agent run
//
// Fatal steps get their own variants so the trigger response can name the
// step (and group) that failed. Existing-id read failures never appear here:
// they are recovered locally with an empty set (see pipeline::run).

use crate::search::SearchError;
use crate::sheets::SheetsError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("could not initialize Google Sheets client: {0}")]
    Init(#[source] SheetsError),

    #[error("job search fetch failed for group '{group}': {source}")]
    Fetch {
        group: String,
        #[source]
        source: SearchError,
    },

    #[error("sheet write failed for group '{group}': {source}")]
    Write {
        group: String,
        #[source]
        source: SheetsError,
    },
}

pub type AppResult<T> = std::result::Result<T, AppError>;
