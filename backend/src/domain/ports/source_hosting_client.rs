//! Driven port for the source-hosting provider's REST API.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{
    Commit, CommitQuery, FileCommit, FileContent, FileRef, FileWrite, Gist, HostedUser, NewGist,
    Repository, Secret,
};

define_port_error! {
    /// Errors surfaced while calling the hosting provider.
    pub enum SourceHostingClientError {
        /// Network transport failed before receiving a response.
        Transport { message: String } => "source hosting transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "source hosting request timed out: {message}",
        /// The provider answered with a non-success status.
        Api { status: u16, message: String } => "GitHub API Error: {message}",
        /// The reply could not be decoded.
        Decode { message: String } => "source hosting response decode failed: {message}",
    }
}

/// Port for the hosting provider, authenticated per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceHostingClient: Send + Sync {
    /// Identify the owner of `token`.
    async fn current_user(&self, token: &Secret) -> Result<HostedUser, SourceHostingClientError>;

    /// Repositories visible to the token, most recently updated first.
    async fn list_repositories(
        &self,
        token: &Secret,
    ) -> Result<Vec<Repository>, SourceHostingClientError>;

    /// Gists owned by the token holder.
    async fn list_gists(&self, token: &Secret) -> Result<Vec<Gist>, SourceHostingClientError>;

    /// A single gist with file contents.
    async fn get_gist(&self, token: &Secret, id: &str) -> Result<Gist, SourceHostingClientError>;

    /// Create a single-file gist.
    async fn create_gist(
        &self,
        token: &Secret,
        gist: &NewGist,
    ) -> Result<Gist, SourceHostingClientError>;

    /// Create or update a repository file.
    async fn put_file(
        &self,
        token: &Secret,
        write: &FileWrite,
    ) -> Result<FileCommit, SourceHostingClientError>;

    /// Fetch and decode a repository file.
    async fn get_file_content(
        &self,
        token: &Secret,
        file: &FileRef,
    ) -> Result<FileContent, SourceHostingClientError>;

    /// Commit history for a branch, optionally restricted to a path.
    async fn list_commits(
        &self,
        token: &Secret,
        query: &CommitQuery,
    ) -> Result<Vec<Commit>, SourceHostingClientError>;
}
