pub mod handlers;
pub mod types;

use axum::routing::{get, post};
use axum::Router;

use crate::config::StationConfig;

/// Shared handler state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: StationConfig,
}

pub fn router(config: StationConfig) -> Router {
    Router::new()
        .route("/api/raw-data", post(handlers::ingest_raw))
        .route("/api/latest", get(handlers::latest))
        .route("/api/export.csv", get(handlers::export_csv))
        .route("/api/log-error", post(handlers::log_error))
        .route("/api/logs", get(handlers::view_logs))
        .with_state(AppState { config })
}
