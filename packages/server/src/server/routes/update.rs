//! Manual refresh trigger.

use axum::{extract::Extension, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domains::substitutions::RefreshOutcome;
use crate::server::app::AxumAppState;
use crate::server::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    message: String,
    last_updated: Option<DateTime<Utc>>,
}

/// Run one refresh cycle and wait for it.
///
/// Upstream failures are absorbed into the snapshot's `lastError` and still
/// answer 200. The cycle runs in its own task so a panic inside it is
/// reported as a 500 here and the cycle is not cancelled if the client
/// disconnects.
pub async fn update_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move { orchestrator.refresh().await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Manual refresh task failed");
            let error = if state.expose_internal_errors {
                e.to_string()
            } else {
                "Internal Server Error".to_string()
            };
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                error,
                "Failed to update substitute plans",
            )
        })?;

    let message = match outcome {
        RefreshOutcome::Updated { .. } => "Substitute plans updated successfully",
        RefreshOutcome::Failed(_) => "Update attempted; upstream error recorded, previous plans kept",
        RefreshOutcome::AlreadyRunning => {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "Conflict",
                "A refresh is already in progress",
            ))
        }
    };

    Ok(Json(UpdateResponse {
        message: message.to_string(),
        last_updated: state.orchestrator.store().read().last_updated,
    }))
}
