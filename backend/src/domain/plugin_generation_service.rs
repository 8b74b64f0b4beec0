//! Plugin generation pipeline: prompt, completion, parse, publish, archive.
//!
//! Publishing is atomic. Archiving is best effort: a failed archive leaves
//! the published plugin in place and is reported beside the result.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    GeneratedPlugin, HistoryRepository, LlmClient, PluginGenerator, PluginWorkspace,
    PluginWorkspaceError, SettingsRepository,
};
use crate::domain::service_support::{
    complete, load_options, missing_field, record_history, require_api_key,
};
use crate::domain::{
    Error, Language, ParseLimits, PluginBlueprint, PluginFilesError, build_plugin_prompt,
    parse_plugin_files,
};

/// Service implementing [`PluginGenerator`].
#[derive(Clone)]
pub struct PluginGenerationService<L, W, H, S> {
    llm: Arc<L>,
    workspace: Arc<W>,
    history_repo: Arc<H>,
    settings_repo: Arc<S>,
    limits: ParseLimits,
}

impl<L, W, H, S> PluginGenerationService<L, W, H, S> {
    /// Create a new service with default parser bounds.
    pub fn new(
        llm: Arc<L>,
        workspace: Arc<W>,
        history_repo: Arc<H>,
        settings_repo: Arc<S>,
    ) -> Self {
        Self {
            llm,
            workspace,
            history_repo,
            settings_repo,
            limits: ParseLimits::default(),
        }
    }

    /// Override the parser bounds.
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }
}

fn map_workspace_error(error: PluginWorkspaceError) -> Error {
    match error {
        PluginWorkspaceError::AlreadyExists { slug } => {
            Error::conflict("A plugin with this slug already exists.")
                .with_details(json!({ "field": "plugin_slug", "slug": slug }))
        }
        PluginWorkspaceError::Io { message } => {
            Error::filesystem("Failed to create plugin directory.")
                .with_details(json!({ "reason": message }))
        }
        PluginWorkspaceError::Archive { message } => {
            Error::filesystem(format!("failed to build plugin archive: {message}"))
        }
    }
}

fn map_parse_error(error: PluginFilesError) -> Error {
    let details = match &error {
        PluginFilesError::UnsafePath(inner) => json!({ "reason": inner.to_string() }),
        PluginFilesError::TooManyFiles { limit } => {
            json!({ "reason": error.to_string(), "limit": limit })
        }
        PluginFilesError::FileTooLarge { path, limit } => {
            json!({ "reason": error.to_string(), "path": path, "limit": limit })
        }
    };
    Error::parse_failure("Failed to parse plugin files from AI response.").with_details(details)
}

fn validate(blueprint: &PluginBlueprint) -> Result<(), Error> {
    if blueprint.name.trim().is_empty() {
        return Err(missing_field("plugin_name", "Missing required plugin data."));
    }
    if blueprint.requirements.trim().is_empty() {
        return Err(missing_field("plugin_prompt", "Missing required plugin data."));
    }
    Ok(())
}

#[async_trait]
impl<L, W, H, S> PluginGenerator for PluginGenerationService<L, W, H, S>
where
    L: LlmClient,
    W: PluginWorkspace,
    H: HistoryRepository,
    S: SettingsRepository,
{
    async fn generate(&self, blueprint: PluginBlueprint) -> Result<GeneratedPlugin, Error> {
        validate(&blueprint)?;
        let options = load_options(self.settings_repo.as_ref()).await?;
        let api_key = require_api_key(&options)?;

        let slug = &blueprint.slug;
        if self.workspace.exists(slug).await.map_err(map_workspace_error)? {
            return Err(map_workspace_error(PluginWorkspaceError::already_exists(
                slug.as_str(),
            )));
        }

        let prompt = build_plugin_prompt(&blueprint);
        let reply = complete(self.llm.as_ref(), api_key, &Language::Php, Vec::new(), &prompt).await?;
        record_history(self.history_repo.as_ref(), &options, &Language::Php, &prompt, &reply).await;

        let files = parse_plugin_files(&reply, self.limits).map_err(map_parse_error)?;
        if files.is_empty() {
            return Err(Error::parse_failure(
                "Failed to parse plugin files from AI response.",
            ));
        }

        let plugin_dir = self
            .workspace
            .materialize(slug, &files)
            .await
            .map_err(map_workspace_error)?;
        info!(slug = %slug, files = files.len(), "published generated plugin");

        let written = files.keys().map(|path| path.as_str().to_owned()).collect();
        let (zip_file, archive_error) = match self.workspace.archive(slug).await {
            Ok(path) => (Some(path.display().to_string()), None),
            Err(error) => {
                warn!(slug = %slug, %error, "plugin archive failed; files remain on disk");
                (None, Some(error.to_string()))
            }
        };

        Ok(GeneratedPlugin {
            plugin_dir: plugin_dir.display().to_string(),
            zip_file,
            files: written,
            archive_error,
        })
    }
}

#[cfg(test)]
#[path = "plugin_generation_service_tests.rs"]
mod tests;
