//! Driven port for generation history persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{HistoryEntry, NewHistoryEntry, RetentionLimit};

define_port_error! {
    /// Errors raised by history repositories.
    pub enum HistoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "history repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "history repository query failed: {message}",
    }
}

/// Port for recording and trimming history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Record one entry.
    async fn insert(&self, entry: &NewHistoryEntry) -> Result<HistoryEntry, HistoryRepositoryError>;

    /// List every entry, newest first.
    async fn list(&self) -> Result<Vec<HistoryEntry>, HistoryRepositoryError>;

    /// Delete the oldest entries beyond `keep`; returns the number removed.
    async fn trim_to(&self, keep: RetentionLimit) -> Result<usize, HistoryRepositoryError>;
}
