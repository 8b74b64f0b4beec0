//! Source-hosting entities returned to clients.
//!
//! These mirror the subset of the hosting provider's payloads that the
//! service forwards. Timestamps stay as provider strings.

use serde::Serialize;

/// Branch used when a request omits one.
pub const DEFAULT_BRANCH: &str = "main";

/// Resolve an optional branch to a concrete one.
pub fn branch_or_default(branch: Option<String>) -> String {
    branch
        .map(|b| b.trim().to_owned())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_owned())
}

/// The account owning an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostedUser {
    /// Login handle.
    pub login: String,
    /// Display name.
    pub name: Option<String>,
    /// Profile page.
    pub html_url: String,
}

/// A repository visible to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Provider identifier.
    pub id: i64,
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Visibility.
    pub private: bool,
    /// Web page.
    pub html_url: String,
    /// Description.
    pub description: Option<String>,
    /// Default branch name.
    pub default_branch: Option<String>,
    /// Last update time.
    pub updated_at: Option<String>,
}

/// One file inside a gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GistFile {
    /// File name.
    pub filename: String,
    /// Detected language.
    pub language: Option<String>,
    /// Raw download URL.
    pub raw_url: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Inline content, present when fetching a single gist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gist {
    /// Provider identifier.
    pub id: String,
    /// Description.
    pub description: Option<String>,
    /// Visibility.
    pub public: bool,
    /// Web page.
    pub html_url: String,
    /// Files in provider order.
    pub files: Vec<GistFile>,
    /// Creation time.
    pub created_at: Option<String>,
    /// Last update time.
    pub updated_at: Option<String>,
}

/// Payload for creating a single-file gist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGist {
    /// File name.
    pub filename: String,
    /// File content.
    pub content: String,
    /// Description.
    pub description: String,
    /// Visibility.
    pub public: bool,
}

/// A file to create or update in a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    /// `owner/name`.
    pub repo_full_name: String,
    /// Path inside the repository.
    pub path: String,
    /// Plain-text content; encoded by the adapter.
    pub content: String,
    /// Commit message.
    pub commit_message: String,
    /// Target branch.
    pub branch: String,
    /// Blob sha of the file being replaced, when updating.
    pub sha: Option<String>,
}

/// Outcome of a file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCommit {
    /// Path of the written file.
    pub path: String,
    /// New blob sha.
    pub content_sha: String,
    /// Commit sha.
    pub commit_sha: String,
    /// Commit web page.
    pub commit_html_url: Option<String>,
}

/// Location of a file in a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// `owner/name`.
    pub repo_full_name: String,
    /// Path inside the repository.
    pub path: String,
    /// Branch to read from.
    pub branch: String,
}

/// Decoded repository file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    /// Decoded text.
    pub content: String,
    /// Blob sha, needed to update the file later.
    pub sha: String,
    /// Size in bytes.
    pub size: u64,
    /// File name.
    pub name: String,
    /// Path inside the repository.
    pub path: String,
    /// Web page.
    pub url: Option<String>,
}

/// Commit history filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
    /// `owner/name`.
    pub repo_full_name: String,
    /// Restrict to commits touching this path.
    pub path: Option<String>,
    /// Branch to walk.
    pub branch: String,
}

/// One commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Commit sha.
    pub sha: String,
    /// Full message.
    pub message: String,
    /// Author name.
    pub author_name: Option<String>,
    /// Author date.
    pub date: Option<String>,
    /// Web page.
    pub html_url: Option<String>,
}
