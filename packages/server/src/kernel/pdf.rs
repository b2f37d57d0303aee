//! PDF text extraction backed by the `pdf-extract` crate.
//!
//! `pdf-extract` is synchronous and CPU bound, and may panic on malformed
//! input, so each call runs on the blocking pool under a timeout. A panic
//! surfaces as a join error and is reported like any other extraction failure.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::errors::ExtractionError;
use super::traits::BaseTextExtractor;

/// Extracts text from PDF bytes
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl PdfTextExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl BaseTextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        let size = bytes.len();
        debug!(size, "Starting PDF text extraction");

        let task = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes));

        let text = match tokio::time::timeout(self.timeout, task).await {
            Err(_) => {
                warn!(size, timeout_secs = self.timeout.as_secs(), "PDF text extraction timed out");
                return Err(ExtractionError::Timeout(self.timeout.as_secs()));
            }
            Ok(Err(join_error)) => {
                warn!(size, error = %join_error, "PDF text extraction task aborted");
                return Err(ExtractionError::Aborted(join_error.to_string()));
            }
            Ok(Ok(Err(e))) => {
                warn!(size, error = %e, "PDF parsing error");
                return Err(ExtractionError::Malformed(e.to_string()));
            }
            Ok(Ok(Ok(text))) => text,
        };

        debug!(
            size,
            text_length = text.len(),
            "PDF parsed successfully"
        );
        Ok(text)
    }
}
