//! Reqwest-backed Anthropic Messages adapter.
//!
//! This adapter owns transport details only: request serialisation, model
//! settings, timeout and HTTP error mapping, and decoding of the first text
//! block.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{ErrorResponseDto, MessageDto, MessagesRequestDto, MessagesResponseDto};
use crate::domain::ports::{Completion, CompletionRequest, LlmClient, LlmClientError};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const UNKNOWN_ERROR: &str = "Unknown error occurred.";

/// Model parameters sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicModelSettings {
    /// Model identifier.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for AnthropicModelSettings {
    fn default() -> Self {
        Self {
            model: "claude-3-7-sonnet-20250219".to_owned(),
            max_tokens: 4000,
            temperature: 0.2,
        }
    }
}

/// Completion adapter that POSTs to one Messages endpoint.
pub struct AnthropicHttpClient {
    client: Client,
    endpoint: Url,
    settings: AnthropicModelSettings,
}

impl AnthropicHttpClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        settings: AnthropicModelSettings,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicHttpClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmClientError> {
        let body = MessagesRequestDto {
            model: &self.settings.model,
            messages: request.messages.iter().map(MessageDto::from).collect(),
            system: &request.system,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-api-key", request.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if status != StatusCode::OK {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let decoded: MessagesResponseDto = serde_json::from_slice(bytes.as_ref())
            .map_err(|error| LlmClientError::decode(format!("invalid JSON payload: {error}")))?;
        let text = decoded
            .into_first_text()
            .ok_or_else(|| LlmClientError::decode("reply contained no text block"))?;
        Ok(Completion { text })
    }
}

fn map_transport_error(error: reqwest::Error) -> LlmClientError {
    if error.is_timeout() {
        LlmClientError::timeout(error.to_string())
    } else {
        LlmClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LlmClientError {
    let message = serde_json::from_slice::<ErrorResponseDto>(body)
        .ok()
        .and_then(|dto| dto.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
    LlmClientError::upstream(status.as_u16(), message)
}
