// Mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.
// Responses can be changed between refresh cycles through `&self` setters,
// so a test can share one mock with the orchestrator via `Arc`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::errors::{ExtractionError, FetchError};
use super::traits::{BaseAI, BaseDocumentFetcher, BaseTextExtractor, Credentials};

// =============================================================================
// Mock Document Fetcher
// =============================================================================

/// Arguments captured from a fetch call
#[derive(Debug, Clone)]
pub struct FetchCallArgs {
    pub url: String,
    pub credentials: Option<Credentials>,
    pub timeout: Duration,
}

pub struct MockDocumentFetcher {
    documents: Arc<Mutex<HashMap<String, std::result::Result<Vec<u8>, FetchError>>>>,
    calls: Arc<Mutex<Vec<FetchCallArgs>>>,
    delay: Duration,
}

impl MockDocumentFetcher {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Serve `body` for `url` until changed
    pub fn with_document(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.set_document(url, body);
        self
    }

    /// Sleep before answering each fetch (for overlap tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_document(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.documents
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.into()));
    }

    /// Answer `url` with an HTTP error status until changed
    pub fn set_failure(&self, url: &str, status: u16) {
        self.documents.lock().unwrap().insert(
            url.to_string(),
            Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
        );
    }

    /// Get all fetch calls with their arguments
    pub fn calls(&self) -> Vec<FetchCallArgs> {
        self.calls.lock().unwrap().clone()
    }

    /// URLs in the order they were fetched
    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }
}

impl Default for MockDocumentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentFetcher for MockDocumentFetcher {
    async fn fetch(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        timeout: Duration,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        // Record the call
        self.calls.lock().unwrap().push(FetchCallArgs {
            url: url.to_string(),
            credentials: credentials.cloned(),
            timeout,
        });

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.documents
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            })
    }
}

// =============================================================================
// Mock Text Extractor
// =============================================================================

/// Treats document bytes as UTF-8 plan text
pub struct MockTextExtractor {
    failing: AtomicBool,
    calls: Arc<Mutex<usize>>,
}

impl MockTextExtractor {
    pub fn new() -> Self {
        Self {
            failing: AtomicBool::new(false),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Make every following extraction fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Default for MockTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTextExtractor for MockTextExtractor {
    async fn extract_text(&self, bytes: Vec<u8>) -> std::result::Result<String, ExtractionError> {
        *self.calls.lock().unwrap() += 1;

        if self.failing.load(Ordering::SeqCst) {
            return Err(ExtractionError::Malformed("mock extraction failure".to_string()));
        }

        String::from_utf8(bytes).map_err(|e| ExtractionError::Malformed(e.to_string()))
    }
}

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

pub struct MockAI {
    responses: Arc<Mutex<Vec<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Ok(response.into()));
        self
    }

    /// Add a failure to the queue
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Record the call
        self.calls.lock().unwrap().push(prompt.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return default mock response
            return Ok("[]".to_string());
        }
        responses.remove(0).map_err(|message| anyhow!(message))
    }
}
