use std::collections::BTreeMap;

use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::server::app::AxumAppState;
use crate::server::ApiError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    status: &'static str,
    last_updated: Option<DateTime<Utc>>,
    endpoints: BTreeMap<&'static str, &'static str>,
}

/// Service descriptor at `/`
pub async fn service_info_handler(Extension(state): Extension<AxumAppState>) -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("/api/health", "Health check"),
        ("/api/substitutions", "Get all substitutions"),
        ("/api/substitutions/today", "Get today's substitutions"),
        ("/api/substitutions/tomorrow", "Get tomorrow's substitutions"),
        (
            "/api/substitutions/class/:className",
            "Get substitutions for specific class (?day=today|tomorrow|both)",
        ),
        ("/api/update", "Trigger a refresh (POST)"),
    ]);

    Json(ServiceInfo {
        service: "LGKA Backend API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        last_updated: state.orchestrator.store().read().last_updated,
        endpoints,
    })
}

/// Fallback for unmatched routes
pub async fn not_found_handler() -> ApiError {
    ApiError::not_found()
}
