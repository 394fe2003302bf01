use axum::{extract::State, http::StatusCode, routing::get, Router};
use tracing::{error, info};

use crate::models::AppState;
use crate::pipeline;
use crate::search::JobSearchClient;
use crate::sheets::SheetsClient;
use crate::types::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/run", get(trigger_run).post(trigger_run))
        .with_state(state)
}

/// Execute one full agent run and report the outcome as plain text. The
/// sheets client is built per invocation so a credential problem surfaces
/// as a 500 response instead of keeping the server from starting.
async fn trigger_run(State(state): State<AppState>) -> (StatusCode, String) {
    info!("agent run triggered");

    let sheets = match SheetsClient::from_key_file(&state.config.sheets) {
        Ok(client) => client,
        Err(source) => {
            let error = AppError::Init(source);
            error!(%error, "agent run aborted before processing any group");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("FATAL ERROR: {}", error),
            );
        }
    };
    let search = JobSearchClient::new(state.config.search.clone());

    match pipeline::run(&state.config, &search, &sheets).await {
        Ok(summary) => (StatusCode::OK, summary.to_string()),
        Err(error) => {
            error!(%error, "agent run failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("ERROR: {}", error))
        }
    }
}
