//! API Routes
//!
//! - `/api/run` - Trigger one agent run (plain-text result)
//! - `/api/health` - Health check

pub mod health;
pub mod run;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(run::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}
