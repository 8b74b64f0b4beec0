//! Plugin generation HTTP handler.
//!
//! ```text
//! POST /api/v1/generate-plugin
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;

use crate::domain::{PluginBlueprint, PluginFeature, PluginSlug};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Admin;
use crate::inbound::http::envelope::ok_with_message;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, required_text};

const NAME: FieldName = FieldName::new("plugin_name");
const SLUG: FieldName = FieldName::new("plugin_slug");
const PROMPT: FieldName = FieldName::new("plugin_prompt");
const COMPONENTS: FieldName = FieldName::new("plugin_components");

/// Request payload for `generate-plugin`.
#[derive(Debug, Deserialize)]
pub struct GeneratePluginBody {
    pub plugin_name: Option<String>,
    pub plugin_slug: Option<String>,
    #[serde(default)]
    pub plugin_description: String,
    #[serde(default)]
    pub plugin_author: String,
    pub plugin_prompt: Option<String>,
    #[serde(default)]
    pub plugin_components: Vec<String>,
}

fn parse_components(raw: &[String]) -> ApiResult<Vec<PluginFeature>> {
    raw.iter()
        .map(|tag| {
            PluginFeature::parse(tag).ok_or_else(|| {
                invalid_value_error(
                    COMPONENTS,
                    "plugin_components accepts settings, shortcode, block and cpt",
                    tag,
                )
            })
        })
        .collect()
}

fn parse_plugin_body(body: GeneratePluginBody) -> ApiResult<PluginBlueprint> {
    let name = required_text(body.plugin_name, NAME)?;
    let raw_slug = required_text(body.plugin_slug, SLUG)?;
    let slug = PluginSlug::new(raw_slug.trim())
        .map_err(|err| invalid_value_error(SLUG, err.to_string(), &raw_slug))?;
    let requirements = required_text(body.plugin_prompt, PROMPT)?;
    let features = parse_components(&body.plugin_components)?;
    Ok(PluginBlueprint {
        name: name.trim().to_owned(),
        slug,
        description: body.plugin_description.trim().to_owned(),
        author: body.plugin_author.trim().to_owned(),
        requirements,
        features,
    })
}

/// Generate a plugin, publish it under the plugins root and archive it.
#[post("/generate-plugin")]
pub async fn generate_plugin(
    state: web::Data<HttpState>,
    _admin: Admin,
    payload: web::Json<GeneratePluginBody>,
) -> ApiResult<HttpResponse> {
    let blueprint = parse_plugin_body(payload.into_inner())?;
    let generated = state.plugins.generate(blueprint).await?;
    let message = if generated.archive_error.is_some() {
        "Plugin generated successfully, but the archive could not be created."
    } else {
        "Plugin generated successfully!"
    };
    Ok(ok_with_message(message, generated))
}
