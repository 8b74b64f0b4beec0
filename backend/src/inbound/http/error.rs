//! Failure envelope rendering for domain errors.
//!
//! Every failed handler answers `{success: false, code, message, traceId?,
//! details?}`. Internal errors keep only their code and trace id.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use tracing::error;

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

#[derive(Serialize)]
struct Failure<'a> {
    success: bool,
    #[serde(flatten)]
    error: &'a Error,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let shown = match self.code() {
            ErrorCode::InternalError => {
                error!(message = self.message(), "internal error");
                self.redacted()
            }
            _ => self.clone(),
        };
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(Failure {
            success: false,
            error: &shown,
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// `web::JsonConfig` error handler: undecodable bodies become
/// `invalid_request` envelopes.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid request body: {err}"))
        .with_details(json!({ "code": "invalid_body" }))
        .into()
}
