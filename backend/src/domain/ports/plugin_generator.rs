//! Driving port for whole-plugin generation.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, PluginBlueprint};

/// Outcome of a successful generation.
///
/// The plugin directory always exists when this is returned; the archive is
/// best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPlugin {
    /// Published plugin directory.
    pub plugin_dir: String,
    /// Archive path, absent when archiving failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_file: Option<String>,
    /// Relative paths written, in reply order.
    pub files: Vec<String>,
    /// Why archiving failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_error: Option<String>,
}

/// Domain use-case port for plugin generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PluginGenerator: Send + Sync {
    /// Generate, publish and archive the plugin described by `blueprint`.
    async fn generate(&self, blueprint: PluginBlueprint) -> Result<GeneratedPlugin, Error>;
}
