//! Plugin slug validation.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and hyphens. They name both the plugin directory and its
//! archive, so anything else is rejected before a prompt is built.

use std::fmt;

/// Maximum accepted slug length.
pub const MAX_SLUG_LEN: usize = 100;

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value) && value.len() <= MAX_SLUG_LEN
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// Validation errors for [`PluginSlug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("plugin slug must match ^[a-z0-9-]+$ (max {MAX_SLUG_LEN} characters): {value:?}")]
pub struct SlugValidationError {
    value: String,
}

/// Validated plugin slug.
///
/// # Examples
/// ```
/// use devassist::domain::PluginSlug;
///
/// assert!(PluginSlug::new("demo-plugin").is_ok());
/// assert!(PluginSlug::new("Demo Plugin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginSlug(String);

impl PluginSlug {
    /// Validate and wrap a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(SlugValidationError { value })
        }
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Archive file name placed beside the plugin directory.
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl AsRef<str> for PluginSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PluginSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
