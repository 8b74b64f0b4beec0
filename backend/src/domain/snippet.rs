//! Saved code snippets.
//!
//! Snippets are created by an explicit save action, listed newest first and
//! deleted by id. There is no update path.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Language;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 255;

/// Validation errors for [`NewSnippet`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnippetValidationError {
    /// The title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The title exceeded [`MAX_TITLE_CHARS`].
    #[error("title must be at most {MAX_TITLE_CHARS} characters")]
    TitleTooLong,
    /// The code was blank.
    #[error("code must not be empty")]
    EmptyCode,
}

/// A persisted snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Language tag.
    pub language: Language,
    /// Code text, stored verbatim.
    pub code: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A validated snippet awaiting insertion.
///
/// # Examples
/// ```
/// use devassist::domain::{Language, NewSnippet};
///
/// let snippet = NewSnippet::new("Hello", "<?php echo 'hi';", Language::Php, None)
///     .expect("valid snippet");
/// assert_eq!(snippet.title(), "Hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    title: String,
    language: Language,
    code: String,
    description: Option<String>,
}

impl NewSnippet {
    /// Validate the fields of a new snippet.
    pub fn new(
        title: impl Into<String>,
        code: impl Into<String>,
        language: Language,
        description: Option<String>,
    ) -> Result<Self, SnippetValidationError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(SnippetValidationError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(SnippetValidationError::TitleTooLong);
        }
        let code = code.into();
        if code.trim().is_empty() {
            return Err(SnippetValidationError::EmptyCode);
        }
        let description = description
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        Ok(Self {
            title,
            language,
            code,
            description,
        })
    }

    /// Trimmed title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Language tag.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Code text.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Attach store-assigned fields.
    pub fn into_snippet(self, id: i64, created_at: DateTime<Utc>) -> Snippet {
        Snippet {
            id,
            title: self.title,
            language: self.language,
            code: self.code,
            description: self.description,
            created_at,
        }
    }
}
