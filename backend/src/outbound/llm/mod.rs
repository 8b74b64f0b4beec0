//! Language-model outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `LlmClient` port
//! against the Anthropic Messages API.

mod dto;
mod http_client;

pub use http_client::{AnthropicHttpClient, AnthropicModelSettings};
