//! In-process test harness.
//!
//! Wires the real orchestrator, store and router to mock collaborators and
//! drives the router with `tower::ServiceExt::oneshot`, so no sockets or
//! upstream hosts are involved.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use substitution_core::domains::substitutions::{
    DocumentSources, PatternExtractor, RefreshOrchestrator, RefreshOutcome, SnapshotStore,
    SubstitutionExtractor,
};
use substitution_core::kernel::{Credentials, MockDocumentFetcher, MockTextExtractor, ServerDeps};
use substitution_core::server::{build_app, AxumAppState};
use tower::ServiceExt;

use super::fixtures::{TODAY_PLAN, TODAY_URL, TOMORROW_PLAN, TOMORROW_URL};

pub struct TestHarness {
    pub fetcher: Arc<MockDocumentFetcher>,
    pub text_extractor: Arc<MockTextExtractor>,
    pub orchestrator: Arc<RefreshOrchestrator>,
    pub app: Router,
}

pub fn test_credentials() -> Credentials {
    Credentials {
        username: "vertretungsplan".to_string(),
        password: "secret".to_string(),
    }
}

impl TestHarness {
    /// Harness whose upstream serves the default fixture plans
    pub fn new() -> Self {
        let fetcher = MockDocumentFetcher::new()
            .with_document(TODAY_URL, TODAY_PLAN)
            .with_document(TOMORROW_URL, TOMORROW_PLAN);
        Self::with_fetcher(fetcher, Arc::new(PatternExtractor::new()))
    }

    pub fn with_fetcher(
        fetcher: MockDocumentFetcher,
        extractor: Arc<dyn SubstitutionExtractor>,
    ) -> Self {
        // Respect RUST_LOG; try_init because every test builds a harness
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let fetcher = Arc::new(fetcher);
        let text_extractor = Arc::new(MockTextExtractor::new());

        let deps = ServerDeps::new(fetcher.clone(), text_extractor.clone(), extractor);
        let sources = DocumentSources {
            today_url: TODAY_URL.to_string(),
            tomorrow_url: TOMORROW_URL.to_string(),
            credentials: Some(test_credentials()),
            fetch_timeout: Duration::from_secs(10),
        };
        let orchestrator = Arc::new(RefreshOrchestrator::new(
            deps,
            sources,
            Arc::new(SnapshotStore::new()),
        ));
        let app = build_app(AxumAppState::new(orchestrator.clone(), false));

        Self {
            fetcher,
            text_extractor,
            orchestrator,
            app,
        }
    }

    /// Rebuild the router with a different read-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.app = build_app(
            AxumAppState::new(self.orchestrator.clone(), false).with_request_timeout(timeout),
        );
        self
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.orchestrator.refresh().await
    }

    pub async fn request(&self, method: Method, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path).await
    }

    pub async fn post(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::POST, path).await
    }
}
