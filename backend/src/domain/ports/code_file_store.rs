//! Driven port for the individual files touched by injection, export and
//! patching.
//!
//! Paths are absolute; the service decides where things go.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by the file store.
    pub enum CodeFileStoreError {
        /// The file does not exist.
        NotFound { path: String } => "file does not exist: {path}",
        /// Reading, writing or copying failed.
        Io { path: String, message: String } => "file operation failed for {path}: {message}",
    }
}

/// Port for reading, writing and copying single files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeFileStore: Send + Sync {
    /// Whether `path` names an existing regular file.
    async fn exists(&self, path: &Path) -> Result<bool, CodeFileStoreError>;

    /// Read `path` as UTF-8 text.
    async fn read(&self, path: &Path) -> Result<String, CodeFileStoreError>;

    /// Replace the contents of `path`, creating parent directories.
    async fn write(&self, path: &Path, contents: &str) -> Result<(), CodeFileStoreError>;

    /// Copy `from` to `to`, creating parent directories of `to`.
    async fn copy(&self, from: &Path, to: &Path) -> Result<PathBuf, CodeFileStoreError>;
}
