//! Bearer-token guard for the admin request surface.
//!
//! Every `/api/v1` handler takes an [`Admin`] argument. Extraction succeeds
//! only when the `Authorization` header carries `Bearer <admin_token>`;
//! anything else is a `forbidden` envelope.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, Secret};

const BEARER_PREFIX: &str = "Bearer ";

/// Token configured for the admin surface, registered as app data.
#[derive(Clone, Debug)]
pub struct AdminToken(Secret);

impl AdminToken {
    /// Wrap the configured token.
    pub fn new(token: Secret) -> Self {
        Self(token)
    }

    fn matches(&self, presented: &str) -> bool {
        let expected = self.0.expose().as_bytes();
        let presented = presented.as_bytes();
        // Compare every byte so timing does not reveal the matching prefix.
        expected.len() == presented.len()
            && expected
                .iter()
                .zip(presented)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

/// Proof that the caller presented the admin token.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

fn bearer(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
}

fn authorise(req: &HttpRequest) -> Result<Admin, Error> {
    let Some(token) = req.app_data::<web::Data<AdminToken>>() else {
        return Err(Error::internal("admin token is not registered"));
    };
    match bearer(req) {
        Some(presented) if token.0.is_set() && token.matches(presented) => Ok(Admin),
        Some(_) => {
            warn!(path = %req.path(), "rejected request with wrong admin token");
            Err(Error::forbidden("Security check failed."))
        }
        None => Err(Error::forbidden("Security check failed.")),
    }
}

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorise(req).map_err(actix_web::Error::from))
    }
}
