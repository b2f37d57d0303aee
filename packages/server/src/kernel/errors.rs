use thiserror::Error;

/// Retrieving an upstream document failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("Request to {url} failed: {cause}")]
    Transport { url: String, cause: String },
}

/// The PDF text extractor could not produce text from the document bytes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Failed to parse PDF: {0}")]
    Malformed(String),

    #[error("PDF text extraction timed out after {0}s")]
    Timeout(u64),

    #[error("PDF text extraction aborted: {0}")]
    Aborted(String),
}
