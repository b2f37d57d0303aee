//! JSON error responses: `{ "error": ..., "message": ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domains::substitutions::QueryError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: Value,
    message: String,
}

/// An error response with an HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: Value,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            "The requested resource was not found",
        )
    }

    /// The stored refresh error, verbatim, as a 500
    pub fn from_query(error: QueryError, message: &str) -> Self {
        match error {
            QueryError::RefreshFailed(refresh_error) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::to_value(refresh_error).unwrap_or(Value::Null),
                message,
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
