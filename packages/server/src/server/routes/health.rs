use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    timestamp: DateTime<Utc>,
    /// Seconds since the server started
    uptime: f64,
    last_updated: Option<DateTime<Utc>>,
    has_error: bool,
}

/// Health check endpoint
///
/// Always 200 while the process is serving; a failed refresh shows up as `hasError`.
pub async fn health_handler(Extension(state): Extension<AxumAppState>) -> Json<HealthResponse> {
    let snapshot = state.orchestrator.store().read();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        last_updated: snapshot.last_updated,
        has_error: snapshot.last_error.is_some(),
    })
}
