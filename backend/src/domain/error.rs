//! Failure payload returned by every use-case.
//!
//! Transport agnostic: the HTTP adapter chooses a status from the
//! [`ErrorCode`] and wraps the payload in the failure envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

const FALLBACK_MESSAGE: &str = "Unknown error occurred.";

/// Machine-readable failure category, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Forbidden,
    NotFound,
    Conflict,
    /// A credential or setting the call needs is missing.
    NotConfigured,
    /// The model provider or GitHub failed or was unreachable.
    UpstreamFailure,
    /// The model reply held nothing usable.
    ParseFailure,
    FilesystemFailure,
    InternalError,
}

/// Code, message and optional correlation data.
///
/// The message is never blank: [`Error::new`] substitutes a fallback.
/// The trace id of the request in scope is captured at construction.
///
/// # Examples
/// ```
/// use devassist::domain::{Error, ErrorCode};
/// use serde_json::json;
///
/// let err = Error::not_found("snippet 7 does not exist")
///     .with_details(json!({ "id": 7 }));
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.details(), Some(&json!({ "id": 7 })));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

macro_rules! shorthand {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for [`ErrorCode::", stringify!($code), "`].")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = FALLBACK_MESSAGE.to_owned();
        }
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    shorthand! {
        invalid_request => InvalidRequest,
        forbidden => Forbidden,
        not_found => NotFound,
        conflict => Conflict,
        not_configured => NotConfigured,
        upstream => UpstreamFailure,
        parse_failure => ParseFailure,
        filesystem => FilesystemFailure,
        internal => InternalError,
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Override the captured trace id; blank ids are ignored.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.trim().is_empty() {
            self.trace_id = Some(id);
        }
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Same code and trace id with a generic message and no details.
    pub fn redacted(&self) -> Self {
        Self {
            code: self.code,
            message: "Internal server error".to_owned(),
            trace_id: self.trace_id.clone(),
            details: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
