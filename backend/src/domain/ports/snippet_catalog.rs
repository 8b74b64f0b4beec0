//! Driving port for saved snippets.

use async_trait::async_trait;

use crate::domain::{Error, NewSnippet, Snippet};

/// Domain use-case port for snippet management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetCatalog: Send + Sync {
    /// Save a validated snippet.
    async fn save(&self, snippet: NewSnippet) -> Result<Snippet, Error>;

    /// Every snippet, newest first.
    async fn list(&self) -> Result<Vec<Snippet>, Error>;

    /// Delete by id; a missing id is `not_found`.
    async fn delete(&self, id: i64) -> Result<(), Error>;
}
