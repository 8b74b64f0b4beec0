//! Prompt construction for plugin generation.
//!
//! Pure text assembly: no I/O. The slug is already validated by
//! [`PluginSlug`] before a [`PluginBlueprint`] can exist.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::PluginSlug;

/// Optional plugin components the model is asked to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginFeature {
    /// An admin settings page.
    #[serde(rename = "settings")]
    SettingsPage,
    /// A shortcode handler.
    Shortcode,
    /// A block editor block.
    Block,
    /// A custom post type.
    #[serde(rename = "cpt")]
    CustomPostType,
}

impl PluginFeature {
    /// Parse the wire tag used by the request surface.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "settings" => Some(Self::SettingsPage),
            "shortcode" => Some(Self::Shortcode),
            "block" => Some(Self::Block),
            "cpt" => Some(Self::CustomPostType),
            _ => None,
        }
    }

    fn prompt_line(self) -> &'static str {
        match self {
            Self::SettingsPage => "- Settings page",
            Self::Shortcode => "- Shortcode functionality",
            Self::Block => "- Gutenberg block",
            Self::CustomPostType => "- Custom Post Type",
        }
    }

    const ORDER: [Self; 4] = [
        Self::SettingsPage,
        Self::Shortcode,
        Self::Block,
        Self::CustomPostType,
    ];
}

/// Everything needed to describe a plugin to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginBlueprint {
    /// Human-readable plugin name.
    pub name: String,
    /// Directory and archive name.
    pub slug: PluginSlug,
    /// Short description.
    pub description: String,
    /// Author credit.
    pub author: String,
    /// Free-text requirements.
    pub requirements: String,
    /// Requested components.
    pub features: Vec<PluginFeature>,
}

/// Build the generation prompt for `blueprint`.
///
/// Components are listed in a fixed order regardless of request order, and
/// each is listed once.
///
/// # Examples
/// ```
/// use devassist::domain::{PluginBlueprint, PluginFeature, PluginSlug, build_plugin_prompt};
///
/// let blueprint = PluginBlueprint {
///     name: "Demo".into(),
///     slug: PluginSlug::new("demo-plugin").expect("slug"),
///     description: String::new(),
///     author: String::new(),
///     requirements: "add a shortcode [hi] that prints Hello".into(),
///     features: vec![PluginFeature::Shortcode],
/// };
/// let prompt = build_plugin_prompt(&blueprint);
/// assert!(prompt.contains("Plugin Slug: demo-plugin"));
/// assert!(prompt.contains("```demo-plugin.php```"));
/// ```
pub fn build_plugin_prompt(blueprint: &PluginBlueprint) -> String {
    let mut prompt = String::from("Generate a complete WordPress plugin with the following details:\n\n");
    let _ = writeln!(prompt, "Plugin Name: {}", blueprint.name.trim());
    let _ = writeln!(prompt, "Plugin Slug: {}", blueprint.slug);
    let _ = writeln!(prompt, "Description: {}", blueprint.description.trim());
    let _ = writeln!(prompt, "Author: {}\n", blueprint.author.trim());
    let _ = writeln!(prompt, "Requirements:\n{}\n", blueprint.requirements.trim());

    prompt.push_str("Components to include:\n");
    for feature in PluginFeature::ORDER {
        if blueprint.features.contains(&feature) {
            prompt.push_str(feature.prompt_line());
            prompt.push('\n');
        }
    }

    prompt.push_str(
        "\nPlease generate all necessary files for a complete, working WordPress plugin following WordPress coding standards and best practices. Include proper file headers, activation/deactivation hooks, and security measures.\n\n",
    );
    prompt.push_str(
        "For each file, start with a line containing the file path relative to the plugin root, enclosed in triple backticks, followed by the file content, and end with triple backticks. For example:\n\n",
    );
    let _ = write!(prompt, "```{}.php```\n<?php\n// Plugin code here\n```\n\n", blueprint.slug);
    prompt.push_str("```includes/class-example.php```\n<?php\n// Class code here\n```\n\n");
    prompt.push_str("Please provide all necessary files for a complete plugin structure.");
    prompt
}
