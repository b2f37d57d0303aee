//! Application setup and server configuration.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::Extension,
    http::{
        header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::substitutions::{RefreshOrchestrator, SubstitutionQueries};
use crate::server::error::ApiError;
use crate::server::routes::{
    health_handler, not_found_handler, service_info_handler, substitutions_by_class_handler,
    substitutions_handler, today_handler, tomorrow_handler, update_handler,
};

/// Upper bound for read requests. `/api/update` is not bounded by it: a manual
/// refresh runs as long as the configured fetch, PDF and interpreter timeouts allow.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub orchestrator: Arc<RefreshOrchestrator>,
    pub queries: Arc<SubstitutionQueries>,
    pub started_at: Instant,
    /// Include raw internal error messages in 500 responses (development only)
    pub expose_internal_errors: bool,
    pub request_timeout: Duration,
}

impl AxumAppState {
    pub fn new(orchestrator: Arc<RefreshOrchestrator>, expose_internal_errors: bool) -> Self {
        let queries = Arc::new(SubstitutionQueries::new(orchestrator.store().clone()));
        Self {
            orchestrator,
            queries,
            started_at: Instant::now(),
            expose_internal_errors,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Build the Axum application router
pub fn build_app(state: AxumAppState) -> Router {
    // CORS configuration - allow any origin, the API is read-only
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let expose_internal_errors = state.expose_internal_errors;
    let catch_panic = CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| -> Response {
        let message = panic_message(panic.as_ref());
        tracing::error!(error = %message, "Request handler panicked");
        let message = if expose_internal_errors {
            message
        } else {
            "Something went wrong!".to_string()
        };
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", message)
            .into_response()
    });

    // A known path with the wrong method answers like an unknown path
    let read_routes = Router::new()
        .route("/", get(service_info_handler).fallback(not_found_handler))
        .route("/api/health", get(health_handler).fallback(not_found_handler))
        .route(
            "/api/substitutions",
            get(substitutions_handler).fallback(not_found_handler),
        )
        .route(
            "/api/substitutions/today",
            get(today_handler).fallback(not_found_handler),
        )
        .route(
            "/api/substitutions/tomorrow",
            get(tomorrow_handler).fallback(not_found_handler),
        )
        .route(
            "/api/substitutions/class/:class_name",
            get(substitutions_by_class_handler).fallback(not_found_handler),
        )
        .route_layer(TimeoutLayer::new(state.request_timeout));

    Router::new()
        .merge(read_routes)
        .route(
            "/api/update",
            post(update_handler).fallback(not_found_handler),
        )
        .fallback(not_found_handler)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(catch_panic)
        .layer(Extension(state))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
