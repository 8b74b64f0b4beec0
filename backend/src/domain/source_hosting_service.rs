//! Source-hosting service using the token stored in the options bag.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    SettingsRepository, SourceHosting, SourceHostingClient, SourceHostingClientError,
};
use crate::domain::service_support::{load_options, map_settings_error, missing_field};
use crate::domain::{
    Commit, CommitQuery, Error, FileCommit, FileContent, FileRef, FileWrite, Gist, HostedUser,
    NewGist, Repository, Secret,
};

const TOKEN_MISSING: &str = "GitHub Personal Access Token is not set.";

/// Service implementing [`SourceHosting`].
#[derive(Clone)]
pub struct SourceHostingService<G, S> {
    client: Arc<G>,
    settings_repo: Arc<S>,
}

impl<G, S> SourceHostingService<G, S> {
    /// Create a new service.
    pub fn new(client: Arc<G>, settings_repo: Arc<S>) -> Self {
        Self {
            client,
            settings_repo,
        }
    }
}

fn map_client_error(error: SourceHostingClientError) -> Error {
    match error {
        SourceHostingClientError::Api { status, .. } => {
            Error::upstream(error.to_string()).with_details(json!({ "status": status }))
        }
        SourceHostingClientError::Timeout { .. } => {
            Error::upstream("GitHub did not respond in time.")
        }
        SourceHostingClientError::Transport { message } => Error::upstream(message),
        SourceHostingClientError::Decode { message } => {
            Error::upstream(format!("Unexpected response from GitHub: {message}"))
        }
    }
}

fn require_repo(repo_full_name: &str) -> Result<(), Error> {
    let valid = repo_full_name
        .split_once('/')
        .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'));
    if valid {
        Ok(())
    } else {
        Err(Error::invalid_request("repo_full_name must look like owner/name")
            .with_details(json!({ "field": "repo_full_name", "code": "invalid_format" })))
    }
}

fn require_path(path: &str) -> Result<(), Error> {
    if path.trim().is_empty() {
        Err(missing_field("file_path", "file_path must not be empty"))
    } else {
        Ok(())
    }
}

impl<G, S> SourceHostingService<G, S>
where
    G: SourceHostingClient,
    S: SettingsRepository,
{
    async fn token(&self) -> Result<Secret, Error> {
        let options = load_options(self.settings_repo.as_ref()).await?;
        if options.github_access_token.is_set() {
            Ok(options.github_access_token)
        } else {
            Err(Error::not_configured(TOKEN_MISSING))
        }
    }

    async fn store_token(&self, token: Secret) -> Result<(), Error> {
        let mut options = load_options(self.settings_repo.as_ref()).await?;
        options.github_access_token = token;
        self.settings_repo
            .save(&options)
            .await
            .map_err(map_settings_error)
    }
}

#[async_trait]
impl<G, S> SourceHosting for SourceHostingService<G, S>
where
    G: SourceHostingClient,
    S: SettingsRepository,
{
    async fn connect(&self, token: Secret) -> Result<HostedUser, Error> {
        if !token.is_set() {
            return Err(missing_field("token", "token must not be empty"));
        }
        let user = self
            .client
            .current_user(&token)
            .await
            .map_err(map_client_error)?;
        self.store_token(token).await?;
        info!(login = %user.login, "connected source hosting account");
        Ok(user)
    }

    async fn disconnect(&self) -> Result<(), Error> {
        self.store_token(Secret::default()).await?;
        info!("disconnected source hosting account");
        Ok(())
    }

    async fn repositories(&self) -> Result<Vec<Repository>, Error> {
        let token = self.token().await?;
        self.client
            .list_repositories(&token)
            .await
            .map_err(map_client_error)
    }

    async fn gists(&self) -> Result<Vec<Gist>, Error> {
        let token = self.token().await?;
        self.client.list_gists(&token).await.map_err(map_client_error)
    }

    async fn gist(&self, id: String) -> Result<Gist, Error> {
        if id.trim().is_empty() {
            return Err(missing_field("id", "gist id must not be empty"));
        }
        let token = self.token().await?;
        self.client
            .get_gist(&token, id.trim())
            .await
            .map_err(map_client_error)
    }

    async fn create_gist(&self, gist: NewGist) -> Result<Gist, Error> {
        if gist.filename.trim().is_empty() {
            return Err(missing_field("filename", "filename must not be empty"));
        }
        if gist.content.is_empty() {
            return Err(missing_field("content", "content must not be empty"));
        }
        let token = self.token().await?;
        let created = self
            .client
            .create_gist(&token, &gist)
            .await
            .map_err(map_client_error)?;
        info!(gist_id = %created.id, "created gist");
        Ok(created)
    }

    async fn put_file(&self, write: FileWrite) -> Result<FileCommit, Error> {
        require_repo(&write.repo_full_name)?;
        require_path(&write.path)?;
        if write.commit_message.trim().is_empty() {
            return Err(missing_field("commit_message", "commit_message must not be empty"));
        }
        let token = self.token().await?;
        let commit = self
            .client
            .put_file(&token, &write)
            .await
            .map_err(map_client_error)?;
        info!(
            repo = %write.repo_full_name,
            path = %write.path,
            commit = %commit.commit_sha,
            "committed file"
        );
        Ok(commit)
    }

    async fn file_content(&self, file: FileRef) -> Result<FileContent, Error> {
        require_repo(&file.repo_full_name)?;
        require_path(&file.path)?;
        let token = self.token().await?;
        self.client
            .get_file_content(&token, &file)
            .await
            .map_err(map_client_error)
    }

    async fn commits(&self, query: CommitQuery) -> Result<Vec<Commit>, Error> {
        require_repo(&query.repo_full_name)?;
        let token = self.token().await?;
        self.client
            .list_commits(&token, &query)
            .await
            .map_err(map_client_error)
    }
}
