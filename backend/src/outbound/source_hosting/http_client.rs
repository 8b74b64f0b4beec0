//! Reqwest-backed GitHub REST adapter.
//!
//! This adapter owns transport details only: URL construction, auth headers,
//! timeout and HTTP error mapping, and JSON decoding into domain records.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::dto::{
    ApiErrorDto, CommitDto, ContentsDto, GistDto, NewGistDto, NewGistFileDto, PutContentsDto,
    PutContentsResponseDto, RepositoryDto, UserDto,
};
use crate::domain::ports::{SourceHostingClient, SourceHostingClientError};
use crate::domain::{
    Commit, CommitQuery, FileCommit, FileContent, FileRef, FileWrite, Gist, HostedUser, NewGist,
    Repository, Secret,
};

const USER_AGENT: &str = "devassist/0.1";
const ACCEPT: &str = "application/vnd.github.v3+json";
const UNKNOWN_ERROR: &str = "Unknown error";

/// GitHub adapter rooted at one API base URL.
pub struct GitHubHttpClient {
    client: Client,
    base: Url,
}

impl GitHubHttpClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn url<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, SourceHostingClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| SourceHostingClientError::transport("API base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: &Secret) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", token.expose()))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, ACCEPT)
    }
}

fn repo_segments(repo_full_name: &str) -> impl Iterator<Item = &str> {
    ["repos"].into_iter().chain(repo_full_name.split('/'))
}

fn contents_url(
    client: &GitHubHttpClient,
    repo_full_name: &str,
    path: &str,
) -> Result<Url, SourceHostingClientError> {
    client.url(
        repo_segments(repo_full_name)
            .chain(["contents"])
            .chain(path.split('/').filter(|segment| !segment.is_empty())),
    )
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SourceHostingClientError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref()).map_err(|error| {
        SourceHostingClientError::decode(format!("invalid GitHub JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> SourceHostingClientError {
    if error.is_timeout() {
        SourceHostingClientError::timeout(error.to_string())
    } else {
        SourceHostingClientError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> SourceHostingClientError {
    let message = serde_json::from_slice::<ApiErrorDto>(body)
        .ok()
        .and_then(|dto| dto.message)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
    SourceHostingClientError::api(status.as_u16(), message)
}

#[async_trait]
impl SourceHostingClient for GitHubHttpClient {
    async fn current_user(&self, token: &Secret) -> Result<HostedUser, SourceHostingClientError> {
        let url = self.url(["user"])?;
        let user: UserDto = send(self.request(Method::GET, url, token)).await?;
        Ok(user.into())
    }

    async fn list_repositories(
        &self,
        token: &Secret,
    ) -> Result<Vec<Repository>, SourceHostingClientError> {
        let url = self.url(["user", "repos"])?;
        let request = self
            .request(Method::GET, url, token)
            .query(&[("sort", "updated"), ("per_page", "100")]);
        let repos: Vec<RepositoryDto> = send(request).await?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    async fn list_gists(&self, token: &Secret) -> Result<Vec<Gist>, SourceHostingClientError> {
        let url = self.url(["gists"])?;
        let gists: Vec<GistDto> = send(self.request(Method::GET, url, token)).await?;
        Ok(gists.into_iter().map(Gist::from).collect())
    }

    async fn get_gist(&self, token: &Secret, id: &str) -> Result<Gist, SourceHostingClientError> {
        let url = self.url(["gists", id])?;
        let gist: GistDto = send(self.request(Method::GET, url, token)).await?;
        Ok(gist.into())
    }

    async fn create_gist(
        &self,
        token: &Secret,
        gist: &NewGist,
    ) -> Result<Gist, SourceHostingClientError> {
        let url = self.url(["gists"])?;
        let body = NewGistDto {
            description: &gist.description,
            public: gist.public,
            files: BTreeMap::from([(
                gist.filename.as_str(),
                NewGistFileDto {
                    content: &gist.content,
                },
            )]),
        };
        let created: GistDto = send(self.request(Method::POST, url, token).json(&body)).await?;
        Ok(created.into())
    }

    async fn put_file(
        &self,
        token: &Secret,
        write: &FileWrite,
    ) -> Result<FileCommit, SourceHostingClientError> {
        let url = contents_url(self, &write.repo_full_name, &write.path)?;
        let body = PutContentsDto {
            message: &write.commit_message,
            content: STANDARD.encode(write.content.as_bytes()),
            branch: &write.branch,
            sha: write.sha.as_deref(),
        };
        let committed: PutContentsResponseDto =
            send(self.request(Method::PUT, url, token).json(&body)).await?;
        Ok(committed.into())
    }

    async fn get_file_content(
        &self,
        token: &Secret,
        file: &FileRef,
    ) -> Result<FileContent, SourceHostingClientError> {
        let url = contents_url(self, &file.repo_full_name, &file.path)?;
        let request = self
            .request(Method::GET, url, token)
            .query(&[("ref", file.branch.as_str())]);
        let contents: ContentsDto = send(request).await?;
        contents
            .into_domain()
            .map_err(SourceHostingClientError::decode)
    }

    async fn list_commits(
        &self,
        token: &Secret,
        query: &CommitQuery,
    ) -> Result<Vec<Commit>, SourceHostingClientError> {
        let url = self.url(repo_segments(&query.repo_full_name).chain(["commits"]))?;
        let mut params = vec![("sha", query.branch.as_str())];
        if let Some(path) = query.path.as_deref().filter(|p| !p.trim().is_empty()) {
            params.push(("path", path));
        }
        let request = self.request(Method::GET, url, token).query(&params);
        let commits: Vec<CommitDto> = send(request).await?;
        Ok(commits.into_iter().map(Commit::from).collect())
    }
}

#[cfg(test)]
#[path = "http_client_tests.rs"]
mod tests;
