//! Driven port for writing generated plugins to disk.
//!
//! Publishing is all-or-nothing: either the whole plugin directory appears
//! under its slug or nothing does.

use std::path::PathBuf;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{PluginFiles, PluginSlug};

define_port_error! {
    /// Errors raised while materialising or archiving a plugin.
    pub enum PluginWorkspaceError {
        /// A plugin directory with this slug already exists.
        AlreadyExists { slug: String } => "a plugin directory named {slug} already exists",
        /// Writing the plugin tree failed.
        Io { message: String } => "failed to write plugin files: {message}",
        /// Building the archive failed.
        Archive { message: String } => "failed to build plugin archive: {message}",
    }
}

/// Port for the plugin output directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PluginWorkspace: Send + Sync {
    /// Whether a directory for `slug` is already present.
    async fn exists(&self, slug: &PluginSlug) -> Result<bool, PluginWorkspaceError>;

    /// Write `files` under a new `slug` directory and return its path.
    async fn materialize(
        &self,
        slug: &PluginSlug,
        files: &PluginFiles,
    ) -> Result<PathBuf, PluginWorkspaceError>;

    /// Zip the published `slug` directory and return the archive path.
    async fn archive(&self, slug: &PluginSlug) -> Result<PathBuf, PluginWorkspaceError>;
}
