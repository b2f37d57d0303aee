// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to fetch, what to prompt for, and how to read the text lives in
// domains/substitutions.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseDocumentFetcher)

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::errors::{ExtractionError, FetchError};

// =============================================================================
// Document Fetcher Trait (Infrastructure - upstream PDF source)
// =============================================================================

/// Basic-auth credential pair for the upstream document host
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
pub trait BaseDocumentFetcher: Send + Sync {
    /// Retrieve the raw bytes at `url` in a single request bounded by `timeout`
    async fn fetch(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        timeout: Duration,
    ) -> std::result::Result<Vec<u8>, FetchError>;
}

// =============================================================================
// Text Extractor Trait (Infrastructure - PDF to text)
// =============================================================================

#[async_trait]
pub trait BaseTextExtractor: Send + Sync {
    /// Extract the plain text of a binary document
    async fn extract_text(&self, bytes: Vec<u8>) -> std::result::Result<String, ExtractionError>;
}

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String>;
}
