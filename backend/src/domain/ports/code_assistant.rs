//! Driving port for code generation and its history.

use async_trait::async_trait;
use serde::Serialize;

use super::ChatTurn;
use crate::domain::{Error, HistoryEntry, Language};

/// A code generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCodeRequest {
    /// What to generate.
    pub prompt: String,
    /// Target language.
    pub language: Language,
    /// Prior turns, oldest first.
    pub history: Vec<ChatTurn>,
}

/// Generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    /// Reply text.
    pub content: String,
    /// Language the text was generated for.
    pub language: Language,
}

/// Domain use-case port for code generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeAssistant: Send + Sync {
    /// Generate code, recording non-text generations in history.
    async fn generate(&self, request: GenerateCodeRequest) -> Result<GeneratedCode, Error>;

    /// Send a fixed test prompt and return the reply.
    async fn test_connection(&self) -> Result<String, Error>;

    /// Recorded history, newest first.
    async fn history(&self) -> Result<Vec<HistoryEntry>, Error>;
}
