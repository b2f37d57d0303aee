// AI implementation using an OpenAI-compatible chat completions endpoint
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::BaseAI;
use crate::config::InterpreterConfig;

/// Upper bound for one completion round-trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// OpenAI implementation of AI capabilities
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(config: &InterpreterConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl BaseAI for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        tracing::info!(model = %self.model, prompt_length = prompt.len(), "Calling OpenAI API");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "OpenAI request failed");
                e
            })
            .context("Failed to call OpenAI API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_text, "OpenAI API error");
            bail!("OpenAI API error ({}): {}", status, error_text);
        }

        let chat_response: ChatResponseRaw = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("No response from OpenAI"))?;

        tracing::info!(
            model = %self.model,
            response_length = content.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenAI API response received"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder_trims_base_url() {
        let client = OpenAIClient::new(&InterpreterConfig {
            api_key: "sk-test".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://custom.api.com/v1/".to_string(),
        })
        .unwrap();

        assert_eq!(client.base_url, "https://custom.api.com/v1");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![Message {
                role: "user",
                content: "Hello",
            }],
            temperature: 0.0,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
    }
}
