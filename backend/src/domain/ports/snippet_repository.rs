//! Driven port for snippet persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewSnippet, Snippet};

define_port_error! {
    /// Errors raised by snippet repositories.
    pub enum SnippetRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "snippet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "snippet repository query failed: {message}",
    }
}

/// Port for storing and retrieving snippets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Insert a snippet and return it with its assigned id.
    async fn insert(&self, snippet: &NewSnippet) -> Result<Snippet, SnippetRepositoryError>;

    /// List every snippet, newest first.
    async fn list(&self) -> Result<Vec<Snippet>, SnippetRepositoryError>;

    /// Delete by id; `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, SnippetRepositoryError>;
}
