//! Wire DTOs for the Anthropic Messages API.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChatRole, ChatTurn};

#[derive(Debug, Serialize)]
pub(super) struct MessagesRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: Vec<MessageDto<'a>>,
    pub(super) system: &'a str,
    pub(super) max_tokens: u32,
    pub(super) temperature: f32,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageDto<'a> {
    pub(super) role: ChatRole,
    pub(super) content: &'a str,
}

impl<'a> From<&'a ChatTurn> for MessageDto<'a> {
    fn from(turn: &'a ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: &turn.content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MessagesResponseDto {
    #[serde(default)]
    pub(super) content: Vec<ContentBlockDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentBlockDto {
    #[serde(rename = "type")]
    pub(super) block_type: String,
    #[serde(default)]
    pub(super) text: Option<String>,
}

impl MessagesResponseDto {
    /// First block of type `text`.
    pub(super) fn into_first_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponseDto {
    pub(super) error: Option<ErrorBodyDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    pub(super) message: Option<String>,
}
