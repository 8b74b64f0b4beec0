//! Snippet HTTP handlers.
//!
//! ```text
//! POST /api/v1/save-snippet
//! GET  /api/v1/get-snippets
//! POST /api/v1/delete-snippet
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, NewSnippet, SnippetValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::{Empty, ok, ok_with_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_language, required_text,
};

const TITLE: FieldName = FieldName::new("title");
const CODE: FieldName = FieldName::new("code");
const LANGUAGE: FieldName = FieldName::new("language");
const ID: FieldName = FieldName::new("id");

/// Request payload for `save-snippet`.
#[derive(Debug, Deserialize)]
pub struct SaveSnippetBody {
    pub title: Option<String>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
}

/// Request payload for `delete-snippet`.
#[derive(Debug, Deserialize)]
pub struct DeleteSnippetBody {
    pub id: Option<i64>,
}

fn snippet_validation_error(error: SnippetValidationError) -> Error {
    let field = match error {
        SnippetValidationError::EmptyTitle | SnippetValidationError::TitleTooLong => "title",
        SnippetValidationError::EmptyCode => "code",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": field, "code": "invalid_value" }))
}

fn parse_save_body(body: SaveSnippetBody) -> ApiResult<NewSnippet> {
    let title = required_text(body.title, TITLE)?;
    let code = required_text(body.code, CODE)?;
    let language = parse_language(&required_text(body.language, LANGUAGE)?, LANGUAGE)?;
    NewSnippet::new(title, code, language, body.description).map_err(snippet_validation_error)
}

/// Save a snippet and return its id.
#[post("/save-snippet")]
pub async fn save_snippet(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<SaveSnippetBody>,
) -> ApiResult<HttpResponse> {
    let snippet = parse_save_body(payload.into_inner())?;
    let saved = state.snippets.save(snippet).await?;
    Ok(ok_with_message(
        "Snippet saved successfully!",
        json!({ "id": saved.id, "snippet": saved }),
    ))
}

/// List snippets, newest first.
#[get("/get-snippets")]
pub async fn get_snippets(state: web::Data<HttpState>, _admin: Admin) -> ApiResult<HttpResponse> {
    let snippets = state.snippets.list().await?;
    Ok(ok(json!({ "snippets": snippets })))
}

/// Delete a snippet by id.
#[post("/delete-snippet")]
pub async fn delete_snippet(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<DeleteSnippetBody>,
) -> ApiResult<HttpResponse> {
    let id = payload.id.ok_or_else(|| missing_field_error(ID))?;
    state.snippets.delete(id).await?;
    Ok(ok_with_message("Snippet deleted successfully!", Empty::default()))
}
