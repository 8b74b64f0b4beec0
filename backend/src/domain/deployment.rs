//! Text rules for PHP injection and code export.
//!
//! Everything here is pure string work; the filesystem side lives behind
//! [`crate::domain::ports::CodeFileStore`].

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Language;

/// Directory under the uploads root receiving exported code.
pub const EXPORTS_DIR: &str = "ai-developer-assistant-exports";
/// Directory under the uploads root receiving backups.
pub const BACKUPS_DIR: &str = "ai-developer-assistant-backups";
/// Marker line inserted before appended code.
pub const APPEND_MARKER: &str = "// Code added by AI Developer Assistant";

/// Host locations written by injection, export and patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPaths {
    /// Directory holding installed plugins.
    pub plugins_root: PathBuf,
    /// Root of the uploads tree.
    pub uploads_root: PathBuf,
    /// Theme functions file targeted by [`InjectionTarget::Functions`].
    pub theme_functions_path: PathBuf,
}

impl DeploymentPaths {
    /// Directory receiving backups.
    pub fn backups_dir(&self) -> PathBuf {
        self.uploads_root.join(BACKUPS_DIR)
    }

    /// Directory receiving exports.
    pub fn exports_dir(&self) -> PathBuf {
        self.uploads_root.join(EXPORTS_DIR)
    }

    /// Backup location for `original` taken at `timestamp`.
    pub fn backup_path_for(&self, original: &Path, timestamp: i64) -> PathBuf {
        let name = original
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_owned());
        self.backups_dir().join(backup_file_name(&name, timestamp))
    }
}

/// Where injected PHP code is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionTarget {
    /// The active theme's functions file.
    Functions,
    /// A freshly created single-file plugin.
    NewPlugin,
    /// A file named by a `/* Target: <path> */` comment, or a new upload.
    CustomFile,
}

impl InjectionTarget {
    /// Parse the wire tag; unknown tags yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "functions" => Some(Self::Functions),
            "new_plugin" => Some(Self::NewPlugin),
            "custom_file" => Some(Self::CustomFile),
            _ => None,
        }
    }
}

fn target_comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/\*\s*Target:\s*([^*]+?)\s*\*/")
            .unwrap_or_else(|error| panic!("target comment regex failed to compile: {error}"))
    })
}

/// Split a `/* Target: <path> */` directive out of `code`.
///
/// Returns the trimmed path (if any) and the code with every such comment
/// removed.
///
/// # Examples
/// ```
/// use devassist::domain::extract_target_comment;
///
/// let (path, code) = extract_target_comment("/* Target: /srv/a.php */\necho 1;");
/// assert_eq!(path.as_deref(), Some("/srv/a.php"));
/// assert_eq!(code, "\necho 1;");
/// ```
pub fn extract_target_comment(code: &str) -> (Option<String>, String) {
    let re = target_comment_regex();
    let path = re
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .filter(|p| !p.is_empty());
    match path {
        Some(path) => (Some(path), re.replace_all(code, "").into_owned()),
        None => (None, code.to_owned()),
    }
}

/// Header prepended to code written as a new single-file plugin.
pub fn new_plugin_header(timestamp: i64) -> String {
    format!(
        "<?php\n/**\n * Plugin Name: AI Generated Plugin {timestamp}\n * Description: Automatically generated plugin by AI Developer Assistant\n * Version: 1.0.0\n * Author: AI Developer Assistant\n */\n\n"
    )
}

/// Full source of a new single-file plugin: header followed by `code`.
///
/// A leading `<?php` open tag in `code` is dropped since the header already
/// opens PHP mode.
///
/// # Examples
/// ```
/// use devassist::domain::new_plugin_source;
///
/// let source = new_plugin_source(7, "<?php\nadd_action('init', 'demo');");
/// assert!(source.starts_with("<?php\n/**\n * Plugin Name: AI Generated Plugin 7"));
/// assert_eq!(source.matches("<?php").count(), 1);
/// ```
pub fn new_plugin_source(timestamp: i64, code: &str) -> String {
    let body = code.trim_start();
    let body = body.strip_prefix("<?php").map_or(body, str::trim_start);
    format!("{}{body}", new_plugin_header(timestamp))
}

/// Name used for the `new_plugin` directory and its main file stem.
pub fn new_plugin_name(timestamp: i64) -> String {
    format!("ai-generated-plugin-{timestamp}")
}

/// Default file name for a `custom_file` injection without a directive.
pub fn custom_file_name(timestamp: i64) -> String {
    format!("ai-generated-code-{timestamp}.php")
}

/// Append `code` to `existing`, dropping a trailing `?>` first.
///
/// # Examples
/// ```
/// use devassist::domain::append_code;
///
/// let merged = append_code("<?php\nfoo();\n?>\n", "bar();");
/// assert_eq!(merged, "<?php\nfoo();\n\n\n// Code added by AI Developer Assistant\nbar();");
/// ```
pub fn append_code(existing: &str, code: &str) -> String {
    let trimmed = existing.trim_end();
    let head = trimmed.strip_suffix("?>").unwrap_or(trimmed);
    format!("{head}\n\n{APPEND_MARKER}\n{code}")
}

/// Backup file name for `original` taken at `timestamp`.
pub fn backup_file_name(original: &str, timestamp: i64) -> String {
    format!("{original}.{timestamp}.bak")
}

/// Sanitise an export file name and ensure it carries the language extension.
///
/// Characters outside `[A-Za-z0-9._-]` become `-`, leading dots are
/// stripped, and an empty result falls back to `snippet`.
///
/// # Examples
/// ```
/// use devassist::domain::{Language, export_file_name};
///
/// assert_eq!(export_file_name("my script", &Language::Python), "my-script.py");
/// assert_eq!(export_file_name("../..", &Language::Php), "snippet.php");
/// assert_eq!(export_file_name("util.js", &Language::NodeJs), "util.js");
/// ```
pub fn export_file_name(raw: &str, language: &Language) -> String {
    let sanitised: String = raw
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '-'
            }
        })
        .collect();
    let stripped = sanitised.trim_start_matches(['.', '-']);
    let stem = if stripped.trim_matches('.').is_empty() {
        "snippet"
    } else {
        stripped
    };
    let extension = language.file_extension();
    let has_extension = Path::new(stem)
        .extension()
        .is_some_and(|ext| ext == extension);
    if has_extension {
        stem.to_owned()
    } else {
        format!("{stem}.{extension}")
    }
}
