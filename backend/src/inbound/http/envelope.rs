//! Success envelope shared by every `/api/v1` handler.
//!
//! Successful responses are `{ "success": true, "message"?: ..., <data> }`
//! where the data fields are flattened into the top-level object.

use actix_web::HttpResponse;
use actix_web::http::header;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Success<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(flatten)]
    data: T,
}

/// 200 response carrying `data` in the success envelope.
///
/// `data` must serialise as a map or struct.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    respond(None, data)
}

/// 200 response carrying `message` and `data` in the success envelope.
pub fn ok_with_message<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(Some(message), data)
}

fn respond<T: Serialize>(message: Option<&str>, data: T) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(Success {
            success: true,
            message,
            data,
        })
}

/// Data-less payload for handlers that only report a message.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}
