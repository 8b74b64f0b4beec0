//! Snippet management service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{SnippetCatalog, SnippetRepository, SnippetRepositoryError};
use crate::domain::{Error, NewSnippet, Snippet};

/// Service implementing [`SnippetCatalog`].
#[derive(Clone)]
pub struct SnippetService<R> {
    repo: Arc<R>,
}

impl<R> SnippetService<R> {
    /// Create a new service.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

fn map_repo_error(error: SnippetRepositoryError) -> Error {
    match error {
        SnippetRepositoryError::Connection { message } => {
            Error::internal(format!("snippet repository unavailable: {message}"))
        }
        SnippetRepositoryError::Query { message } => {
            Error::internal(format!("snippet repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> SnippetCatalog for SnippetService<R>
where
    R: SnippetRepository,
{
    async fn save(&self, snippet: NewSnippet) -> Result<Snippet, Error> {
        let saved = self.repo.insert(&snippet).await.map_err(map_repo_error)?;
        info!(snippet_id = saved.id, language = %saved.language, "saved snippet");
        Ok(saved)
    }

    async fn list(&self) -> Result<Vec<Snippet>, Error> {
        self.repo.list().await.map_err(map_repo_error)
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        if self.repo.delete(id).await.map_err(map_repo_error)? {
            info!(snippet_id = id, "deleted snippet");
            Ok(())
        } else {
            Err(Error::not_found(format!("Snippet {id} not found.")))
        }
    }
}
