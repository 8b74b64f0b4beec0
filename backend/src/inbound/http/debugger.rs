//! Error debugging HTTP handlers.
//!
//! ```text
//! POST /api/v1/debug-error
//! POST /api/v1/patch-error
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::PatchRequest;
use crate::domain::{AnalysisHtml, ErrorAnalysis, ErrorReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::{ok, ok_with_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_text};

const ERROR_MESSAGE: FieldName = FieldName::new("error_message");
const ERROR_FILE: FieldName = FieldName::new("error_file");
const CODE_FIX: FieldName = FieldName::new("code_fix");

/// Request payload for `debug-error`.
#[derive(Debug, Deserialize)]
pub struct DebugErrorBody {
    pub error_message: Option<String>,
    pub error_context: Option<String>,
    pub error_file: Option<String>,
}

/// Request payload for `patch-error`.
#[derive(Debug, Deserialize)]
pub struct PatchErrorBody {
    pub error_file: Option<String>,
    pub code_fix: Option<String>,
}

/// Analysis sections plus their HTML renditions.
#[derive(Debug, Serialize)]
pub struct DebugErrorResponse {
    #[serde(flatten)]
    pub analysis: ErrorAnalysis,
    pub html: AnalysisHtml,
}

impl From<ErrorAnalysis> for DebugErrorResponse {
    fn from(analysis: ErrorAnalysis) -> Self {
        let html = analysis.html();
        Self { analysis, html }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Ask the model to explain an error and, when a file is named, propose a fix.
#[post("/debug-error")]
pub async fn debug_error(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<DebugErrorBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let report = ErrorReport {
        message: required_text(body.error_message, ERROR_MESSAGE)?,
        context: non_blank(body.error_context),
        file: non_blank(body.error_file).map(|file| file.trim().to_owned()),
    };
    let analysis = state.debugger.analyse(report).await?;
    Ok(ok(DebugErrorResponse::from(analysis)))
}

/// Replace a file with a proposed fix after backing it up.
#[post("/patch-error")]
pub async fn patch_error(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<PatchErrorBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = PatchRequest {
        file: required_text(body.error_file, ERROR_FILE)?,
        code_fix: required_text(body.code_fix, CODE_FIX)?,
    };
    let outcome = state.debugger.patch(request).await?;
    Ok(ok_with_message(
        "File patched successfully! A backup was created.",
        outcome,
    ))
}
