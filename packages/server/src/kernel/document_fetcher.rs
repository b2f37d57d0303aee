//! HTTP document fetcher for the upstream substitution PDFs.
//!
//! The school's document host sits behind basic auth and presents a
//! self-signed certificate. Certificate tolerance is a client-level setting;
//! credentials and timeout are per request.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

use super::errors::FetchError;
use super::traits::{BaseDocumentFetcher, Credentials};

const USER_AGENT: &str = concat!("substitution-plan-server/", env!("CARGO_PKG_VERSION"));

/// Fetches documents with reqwest
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    /// Build a fetcher; `accept_invalid_certs` tolerates self-signed upstream hosts.
    pub fn new(accept_invalid_certs: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn map_error(url: &str, timeout: Duration, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_secs: timeout.as_secs(),
            }
        } else if let Some(status) = error.status() {
            FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                cause: error_chain(&error),
            }
        }
    }
}

/// Flatten an error and its sources into one line ("connect error: dns error: ...").
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl BaseDocumentFetcher for HttpDocumentFetcher {
    async fn fetch(
        &self,
        url: &str,
        credentials: Option<&Credentials>,
        timeout: Duration,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        debug!(url = %url, timeout_secs = timeout.as_secs(), "Fetching document");

        let mut request = self.client.get(url).timeout(timeout);
        if let Some(credentials) = credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Document request failed");
            Self::map_error(url, timeout, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Document host returned an error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(url, timeout, e))?;

        debug!(url = %url, size = bytes.len(), "Document fetched");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_and_without_cert_tolerance() {
        assert!(HttpDocumentFetcher::new(true).is_ok());
        assert!(HttpDocumentFetcher::new(false).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let fetcher = HttpDocumentFetcher::new(true).unwrap();
        let result = fetcher
            .fetch("http://127.0.0.1:9/plan.pdf", None, Duration::from_secs(2))
            .await;

        match result {
            Err(FetchError::Transport { url, .. }) | Err(FetchError::Timeout { url, .. }) => {
                assert_eq!(url, "http://127.0.0.1:9/plan.pdf")
            }
            other => panic!("expected transport failure, got {:?}", other),
        }
    }
}
