// Job Harvester - scheduled job-aggregation agent for Google Jobs listings

pub mod config;
pub mod models;
pub mod types;
pub mod search;    // Search API (SerpAPI Google Jobs engine)
pub mod sheets;    // Google Sheets persistence (read ids, bulk append)
pub mod pipeline;  // Fetch -> filter -> dedup -> write orchestration
pub mod routes;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
