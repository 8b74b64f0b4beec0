//! Export and PHP injection HTTP handlers.
//!
//! ```text
//! POST /api/v1/export-code
//! POST /api/v1/inject-php-code
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

use crate::domain::InjectionTarget;
use crate::domain::ports::{ExportRequest, InjectRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::ok_with_message;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_language, required_text,
};

const CODE: FieldName = FieldName::new("code");
const LANGUAGE: FieldName = FieldName::new("language");
const TARGET: FieldName = FieldName::new("target");

/// Request payload for `export-code`.
#[derive(Debug, Deserialize)]
pub struct ExportCodeBody {
    pub code: Option<String>,
    pub language: Option<String>,
    /// Sanitised server-side; blank becomes `snippet`.
    #[serde(default)]
    pub filename: String,
}

/// Request payload for `inject-php-code`.
#[derive(Debug, Deserialize)]
pub struct InjectCodeBody {
    pub code: Option<String>,
    pub target: Option<String>,
}

fn parse_export_body(body: ExportCodeBody) -> ApiResult<ExportRequest> {
    let code = required_text(body.code, CODE)?;
    let language = parse_language(&required_text(body.language, LANGUAGE)?, LANGUAGE)?;
    Ok(ExportRequest {
        code,
        language,
        filename: body.filename,
    })
}

fn parse_inject_body(body: InjectCodeBody) -> ApiResult<InjectRequest> {
    let code = required_text(body.code, CODE)?;
    let raw_target = required_text(body.target, TARGET)?;
    let target = InjectionTarget::parse(&raw_target).ok_or_else(|| {
        invalid_value_error(
            TARGET,
            "target must be functions, new_plugin or custom_file",
            &raw_target,
        )
    })?;
    Ok(InjectRequest { code, target })
}

/// Write code to the exports directory.
#[post("/export-code")]
pub async fn export_code(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<ExportCodeBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_export_body(payload.into_inner())?;
    let outcome = state.deployment.export(request).await?;
    Ok(ok_with_message("Code exported successfully!", outcome))
}

/// Syntax-check PHP code and write it into the chosen target.
#[post("/inject-php-code")]
pub async fn inject_php_code(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<InjectCodeBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_inject_body(payload.into_inner())?;
    let outcome = state.deployment.inject(request).await?;
    Ok(ok_with_message("Code injected successfully!", outcome))
}
