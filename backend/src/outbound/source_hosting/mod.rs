//! Source-hosting outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `SourceHostingClient` port against the GitHub REST API.

mod dto;
mod http_client;

pub use http_client::GitHubHttpClient;
