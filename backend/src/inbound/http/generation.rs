//! Code generation HTTP handlers.
//!
//! ```text
//! POST /api/v1/generate-code
//! GET  /api/v1/test-api-connection
//! GET  /api/v1/get-history
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::Language;
use crate::domain::ports::{ChatTurn, GenerateCodeRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::{ok, ok_with_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_language, required_text};

const PROMPT: FieldName = FieldName::new("prompt");
const LANGUAGE: FieldName = FieldName::new("language");

/// Request payload for `generate-code`.
#[derive(Debug, Deserialize)]
pub struct GenerateCodeBody {
    pub prompt: Option<String>,
    /// Defaults to `php` when omitted.
    pub language: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

fn parse_generate_body(body: GenerateCodeBody) -> ApiResult<GenerateCodeRequest> {
    let prompt = required_text(body.prompt, PROMPT)?;
    let language = match body.language.as_deref().map(str::trim) {
        None | Some("") => Language::Php,
        Some(raw) => parse_language(raw, LANGUAGE)?,
    };
    Ok(GenerateCodeRequest {
        prompt,
        language,
        history: body.history,
    })
}

/// Generate code for a prompt, continuing the supplied conversation.
#[post("/generate-code")]
pub async fn generate_code(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<GenerateCodeBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_generate_body(payload.into_inner())?;
    let generated = state.assistant.generate(request).await?;
    Ok(ok(generated))
}

/// Check that the configured provider key works.
#[get("/test-api-connection")]
pub async fn test_api_connection(
    state: web::Data<HttpState>,
    _admin: Admin,
) -> ApiResult<HttpResponse> {
    let reply = state.assistant.test_connection().await?;
    Ok(ok_with_message(
        "API connection successful!",
        json!({ "response": reply }),
    ))
}

/// List recorded generations, newest first.
#[get("/get-history")]
pub async fn get_history(state: web::Data<HttpState>, _admin: Admin) -> ApiResult<HttpResponse> {
    let history = state.assistant.history().await?;
    Ok(ok(json!({ "history": history })))
}

#[cfg(test)]
#[path = "generation_tests.rs"]
mod tests;
