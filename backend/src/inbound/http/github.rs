//! Source-hosting HTTP handlers.
//!
//! ```text
//! POST /api/v1/github/connect        POST /api/v1/github/disconnect
//! GET  /api/v1/github/repos          GET  /api/v1/github/gists
//! GET  /api/v1/github/gists/{id}     POST /api/v1/github/gists
//! POST /api/v1/github/files          POST /api/v1/github/file-content
//! POST /api/v1/github/commits
//! ```

use actix_web::{HttpResponse, Scope, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{CommitQuery, FileRef, FileWrite, NewGist, Secret, branch_or_default};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::{Empty, ok, ok_with_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_text};

const TOKEN: FieldName = FieldName::new("token");
const FILENAME: FieldName = FieldName::new("filename");
const REPO: FieldName = FieldName::new("repo_full_name");
const FILE_PATH: FieldName = FieldName::new("file_path");
const COMMIT_MESSAGE: FieldName = FieldName::new("commit_message");

/// Request payload for `github/connect`.
#[derive(Debug, Deserialize)]
pub struct ConnectBody {
    pub token: Option<String>,
}

/// Request payload for creating a gist.
#[derive(Debug, Deserialize)]
pub struct CreateGistBody {
    pub filename: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub public: bool,
}

/// Request payload for committing a file.
#[derive(Debug, Deserialize)]
pub struct PutFileBody {
    pub repo_full_name: Option<String>,
    pub file_path: Option<String>,
    #[serde(default)]
    pub content: String,
    pub commit_message: Option<String>,
    pub branch: Option<String>,
    /// Blob sha of the file being replaced; omit when creating.
    pub sha: Option<String>,
}

/// Request payload for reading a file.
#[derive(Debug, Deserialize)]
pub struct FileContentBody {
    pub repo_full_name: Option<String>,
    pub file_path: Option<String>,
    pub branch: Option<String>,
}

/// Request payload for commit history.
#[derive(Debug, Deserialize)]
pub struct CommitsBody {
    pub repo_full_name: Option<String>,
    pub file_path: Option<String>,
    pub branch: Option<String>,
}

/// Handlers mounted under `/github`.
pub fn scope() -> Scope {
    web::scope("/github")
        .service(connect)
        .service(disconnect)
        .service(repositories)
        .service(gists)
        .service(gist)
        .service(create_gist)
        .service(put_file)
        .service(file_content)
        .service(commits)
}

/// Verify a token against the provider, then store it.
#[post("/connect")]
pub async fn connect(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<ConnectBody>,
) -> ApiResult<HttpResponse> {
    let token = Secret::new(required_text(payload.into_inner().token, TOKEN)?);
    let user = state.source_hosting.connect(token).await?;
    Ok(ok_with_message(
        "Successfully connected to GitHub.",
        json!({ "user": user }),
    ))
}

/// Forget the stored token.
#[post("/disconnect")]
pub async fn disconnect(state: web::Data<HttpState>, _admin: Admin) -> ApiResult<HttpResponse> {
    state.source_hosting.disconnect().await?;
    Ok(ok_with_message("Disconnected from GitHub.", Empty::default()))
}

#[get("/repos")]
pub async fn repositories(state: web::Data<HttpState>, _admin: Admin) -> ApiResult<HttpResponse> {
    let repos = state.source_hosting.repositories().await?;
    Ok(ok(json!({ "repositories": repos })))
}

#[get("/gists")]
pub async fn gists(state: web::Data<HttpState>, _admin: Admin) -> ApiResult<HttpResponse> {
    let listed = state.source_hosting.gists().await?;
    Ok(ok(json!({ "gists": listed })))
}

#[get("/gists/{id}")]
pub async fn gist(
    state: web::Data<HttpState>,
    _admin: Admin,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let found = state.source_hosting.gist(path.into_inner()).await?;
    Ok(ok(json!({ "gist": found })))
}

#[post("/gists")]
pub async fn create_gist(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<CreateGistBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let new_gist = NewGist {
        filename: required_text(body.filename, FILENAME)?.trim().to_owned(),
        content: body.content,
        description: body.description,
        public: body.public,
    };
    let created = state.source_hosting.create_gist(new_gist).await?;
    Ok(ok_with_message(
        "Gist created successfully.",
        json!({ "gist": created }),
    ))
}

/// Create or update a file with one commit.
#[post("/files")]
pub async fn put_file(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<PutFileBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let write = FileWrite {
        repo_full_name: required_text(body.repo_full_name, REPO)?.trim().to_owned(),
        path: required_text(body.file_path, FILE_PATH)?.trim().to_owned(),
        content: body.content,
        commit_message: required_text(body.commit_message, COMMIT_MESSAGE)?,
        branch: branch_or_default(body.branch),
        sha: body.sha.filter(|sha| !sha.trim().is_empty()),
    };
    let commit = state.source_hosting.put_file(write).await?;
    Ok(ok_with_message(
        "File committed successfully.",
        json!({ "commit": commit }),
    ))
}

#[post("/file-content")]
pub async fn file_content(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<FileContentBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let file = FileRef {
        repo_full_name: required_text(body.repo_full_name, REPO)?.trim().to_owned(),
        path: required_text(body.file_path, FILE_PATH)?.trim().to_owned(),
        branch: branch_or_default(body.branch),
    };
    let content = state.source_hosting.file_content(file).await?;
    Ok(ok(json!({ "file": content })))
}

#[post("/commits")]
pub async fn commits(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<CommitsBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let query = CommitQuery {
        repo_full_name: required_text(body.repo_full_name, REPO)?.trim().to_owned(),
        path: body
            .file_path
            .map(|path| path.trim().to_owned())
            .filter(|path| !path.is_empty()),
        branch: branch_or_default(body.branch),
    };
    let history = state.source_hosting.commits(query).await?;
    Ok(ok(json!({ "commits": history })))
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
