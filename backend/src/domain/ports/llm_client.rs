//! Driven port for the language-model completion API.
//!
//! The domain assembles the system instruction and the message list; the
//! adapter owns the model name, token budget and wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;
use crate::domain::Secret;

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The operator.
    User,
    /// The model.
    Assistant,
}

/// One prior or current conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker.
    pub role: ChatRole,
    /// Text of the turn.
    pub content: String,
}

impl ChatTurn {
    /// Convenience constructor for a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Provider credential.
    pub api_key: Secret,
    /// System instruction.
    pub system: String,
    /// Conversation, ending with the current user turn.
    pub messages: Vec<ChatTurn>,
}

/// Text returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// First text block of the reply.
    pub text: String,
}

define_port_error! {
    /// Errors surfaced while calling the completion API.
    pub enum LlmClientError {
        /// Network transport failed before receiving a response.
        Transport { message: String } => "completion transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "completion request timed out: {message}",
        /// The provider answered with a non-success status.
        Upstream { status: u16, message: String } => "{message}",
        /// The reply could not be decoded or had no text block.
        Decode { message: String } => "completion response decode failed: {message}",
    }
}

/// Port for requesting one completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `request` and return the first text block of the reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmClientError>;
}

/// Fixture client echoing the last user turn back.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureLlmClient;

#[async_trait]
impl LlmClient for FixtureLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmClientError> {
        let text = request
            .messages
            .last()
            .map(|turn| turn.content.clone())
            .unwrap_or_default();
        Ok(Completion { text })
    }
}
