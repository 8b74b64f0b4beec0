//! HTTP inbound adapter exposing the admin REST endpoints.

pub mod auth;
pub mod debugger;
pub mod deployment;
pub mod envelope;
pub mod error;
pub mod generation;
pub mod github;
pub mod health;
pub mod plugins;
pub mod routes;
pub mod settings;
pub mod snippets;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
