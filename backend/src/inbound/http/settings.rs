//! Options bag HTTP handlers.
//!
//! ```text
//! GET  /api/v1/settings
//! POST /api/v1/update-settings
//! ```
//!
//! Secrets are write-only: responses only say whether one is configured.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::{Language, OptionsUpdate, Secret};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::{ok, ok_with_message};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_language};

const DEFAULT_LANGUAGE: FieldName = FieldName::new("default_language");
const ENABLED_LANGUAGES: FieldName = FieldName::new("enabled_languages");

/// Partial update payload; absent keys are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsBody {
    pub api_key: Option<String>,
    pub github_access_token: Option<String>,
    pub enable_php_injection: Option<bool>,
    pub default_language: Option<String>,
    pub enabled_languages: Option<Vec<String>>,
    pub max_history_items: Option<u32>,
}

fn parse_update(body: UpdateSettingsBody) -> ApiResult<OptionsUpdate> {
    let default_language = body
        .default_language
        .map(|raw| parse_language(&raw, DEFAULT_LANGUAGE))
        .transpose()?;
    let enabled_languages = body
        .enabled_languages
        .map(|tags| {
            tags.iter()
                .map(|raw| parse_language(raw, ENABLED_LANGUAGES))
                .collect::<ApiResult<Vec<Language>>>()
        })
        .transpose()?;
    Ok(OptionsUpdate {
        api_key: body.api_key.map(Secret::new),
        github_access_token: body.github_access_token.map(Secret::new),
        enable_php_injection: body.enable_php_injection,
        default_language,
        enabled_languages,
        max_history_items: body.max_history_items,
    })
}

/// Current options with secrets redacted.
#[get("/settings")]
pub async fn get_settings(state: web::Data<HttpState>, _admin: Admin) -> ApiResult<HttpResponse> {
    let view = state.settings.view().await?;
    Ok(ok(view))
}

/// Merge the supplied keys into the stored options.
#[post("/update-settings")]
pub async fn update_settings(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<UpdateSettingsBody>,
) -> ApiResult<HttpResponse> {
    let update = parse_update(payload.into_inner())?;
    let view = state.settings.update(update).await?;
    Ok(ok_with_message("Settings updated successfully!", view))
}
