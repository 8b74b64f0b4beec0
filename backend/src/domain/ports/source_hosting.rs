//! Driving port for source-hosting operations using the stored token.

use async_trait::async_trait;

use crate::domain::{
    Commit, CommitQuery, Error, FileCommit, FileContent, FileRef, FileWrite, Gist, HostedUser,
    NewGist, Repository, Secret,
};

/// Domain use-case port for source hosting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceHosting: Send + Sync {
    /// Verify `token` and store it.
    async fn connect(&self, token: Secret) -> Result<HostedUser, Error>;

    /// Forget the stored token.
    async fn disconnect(&self) -> Result<(), Error>;

    /// Repositories visible to the stored token.
    async fn repositories(&self) -> Result<Vec<Repository>, Error>;

    /// Gists of the token holder.
    async fn gists(&self) -> Result<Vec<Gist>, Error>;

    /// One gist by id.
    async fn gist(&self, id: String) -> Result<Gist, Error>;

    /// Create a gist.
    async fn create_gist(&self, gist: NewGist) -> Result<Gist, Error>;

    /// Create or update a repository file.
    async fn put_file(&self, write: FileWrite) -> Result<FileCommit, Error>;

    /// Read a repository file.
    async fn file_content(&self, file: FileRef) -> Result<FileContent, Error>;

    /// Commit history.
    async fn commits(&self, query: CommitQuery) -> Result<Vec<Commit>, Error>;
}
