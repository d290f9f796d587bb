//! Anthropic Messages API client.
//!
//! Endpoint: POST {base}/v1/messages
//! Auth: x-api-key header

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Oracle, OracleError, OracleRequest};

/// Default API base, overridable for tests and proxies.
pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Oracle backed by the Anthropic Messages API
pub struct AnthropicOracle {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl AnthropicOracle {
    /// Create a client with a bounded request timeout
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Create from environment variables (`ANTHROPIC_API_KEY` required,
    /// `INZICHT_API_BASE` optional)
    pub fn from_env(model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable required")?;
        let api_base =
            std::env::var("INZICHT_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Ok(Self::new(api_key, api_base, model, timeout))
    }

    /// Model this client sends requests to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_api_request(&self, request: OracleRequest) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: request.system,
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: request.user,
            }],
        }
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        let url = format!("{}/v1/messages", self.api_base);
        let payload = self.to_api_request(request);

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout
                } else {
                    OracleError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let text = body
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(OracleError::EmptyReply);
        }

        Ok(text)
    }
}

/// Map an HTTP error status to an oracle failure kind
fn classify_status(status: u16, body: &str) -> OracleError {
    match status {
        401 | 403 => OracleError::Auth,
        429 => OracleError::RateLimit,
        _ => {
            let message = serde_json::from_str::<ApiError>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.trim().to_string());
            OracleError::Api { status, message }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<ApiMessage>,
}

#[derive(Debug, Clone, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiResponse {
    content: Vec<ApiContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
