//! DTOs for the GitHub REST payloads the service forwards.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! domain records in one pass.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::domain::{Commit, FileCommit, FileContent, Gist, GistFile, HostedUser, Repository};

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorDto {
    pub(super) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    login: String,
    name: Option<String>,
    html_url: String,
}

impl From<UserDto> for HostedUser {
    fn from(dto: UserDto) -> Self {
        Self {
            login: dto.login,
            name: dto.name,
            html_url: dto.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryDto {
    id: i64,
    name: String,
    full_name: String,
    #[serde(default)]
    private: bool,
    html_url: String,
    description: Option<String>,
    default_branch: Option<String>,
    updated_at: Option<String>,
}

impl From<RepositoryDto> for Repository {
    fn from(dto: RepositoryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            full_name: dto.full_name,
            private: dto.private,
            html_url: dto.html_url,
            description: dto.description,
            default_branch: dto.default_branch,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GistDto {
    id: String,
    description: Option<String>,
    #[serde(default)]
    public: bool,
    html_url: String,
    #[serde(default)]
    files: BTreeMap<String, GistFileDto>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GistFileDto {
    filename: Option<String>,
    language: Option<String>,
    raw_url: Option<String>,
    #[serde(default)]
    size: u64,
    content: Option<String>,
}

impl From<GistDto> for Gist {
    fn from(dto: GistDto) -> Self {
        let files = dto
            .files
            .into_iter()
            .map(|(key, file)| GistFile {
                filename: file.filename.unwrap_or(key),
                language: file.language,
                raw_url: file.raw_url,
                size: file.size,
                content: file.content,
            })
            .collect();
        Self {
            id: dto.id,
            description: dto.description,
            public: dto.public,
            html_url: dto.html_url,
            files,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NewGistDto<'a> {
    pub(super) description: &'a str,
    pub(super) public: bool,
    pub(super) files: BTreeMap<&'a str, NewGistFileDto<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct NewGistFileDto<'a> {
    pub(super) content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct PutContentsDto<'a> {
    pub(super) message: &'a str,
    pub(super) content: String,
    pub(super) branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PutContentsResponseDto {
    content: ContentRefDto,
    commit: CommitRefDto,
}

#[derive(Debug, Deserialize)]
struct ContentRefDto {
    path: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitRefDto {
    sha: String,
    html_url: Option<String>,
}

impl From<PutContentsResponseDto> for FileCommit {
    fn from(dto: PutContentsResponseDto) -> Self {
        Self {
            path: dto.content.path,
            content_sha: dto.content.sha,
            commit_sha: dto.commit.sha,
            commit_html_url: dto.commit.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ContentsDto {
    #[serde(default)]
    content: String,
    sha: String,
    #[serde(default)]
    size: u64,
    name: String,
    path: String,
    html_url: Option<String>,
}

impl ContentsDto {
    /// Decode the base64 body, which GitHub wraps at 60 columns.
    pub(super) fn into_domain(self) -> Result<FileContent, String> {
        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|error| format!("invalid base64 content for {}: {error}", self.path))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| format!("{} is not UTF-8 text", self.path))?;
        Ok(FileContent {
            content,
            sha: self.sha,
            size: self.size,
            name: self.name,
            path: self.path,
            url: self.html_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitDto {
    sha: String,
    commit: CommitDetailDto,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitDetailDto {
    message: String,
    author: Option<CommitAuthorDto>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthorDto {
    name: Option<String>,
    date: Option<String>,
}

impl From<CommitDto> for Commit {
    fn from(dto: CommitDto) -> Self {
        let (author_name, date) = dto
            .commit
            .author
            .map_or((None, None), |author| (author.name, author.date));
        Self {
            sha: dto.sha,
            message: dto.commit.message,
            author_name,
            date,
            html_url: dto.html_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wrapped_base64_content() {
        let dto: ContentsDto = serde_json::from_str(
            r#"{
                "content": "PD9waHAKZWNo\nbyAnaGknOwo=\n",
                "sha": "abc",
                "size": 18,
                "name": "index.php",
                "path": "src/index.php",
                "html_url": "https://github.com/o/r/blob/main/src/index.php"
            }"#,
        )
        .expect("payload decodes");

        let file = dto.into_domain().expect("content decodes");
        assert_eq!(file.content, "<?php\necho 'hi';\n");
        assert_eq!(file.path, "src/index.php");
    }

    #[test]
    fn gist_files_take_their_map_key_when_unnamed() {
        let dto: GistDto = serde_json::from_str(
            r#"{
                "id": "g1",
                "description": null,
                "public": false,
                "html_url": "https://gist.github.com/g1",
                "files": { "a.php": { "size": 3 } }
            }"#,
        )
        .expect("payload decodes");

        let gist = Gist::from(dto);
        assert_eq!(gist.files.len(), 1);
        assert_eq!(gist.files[0].filename, "a.php");
    }
}
