//! Language tags accepted by code generation and their fixed instructions.
//!
//! Each tag maps to one system instruction sent with every completion request
//! and to the file extension used when exporting code. Unrecognised tags are
//! carried through unchanged and fall back to the generic instruction.

use std::fmt;

use serde::{Deserialize, Serialize};

const BASE_INSTRUCTION: &str = "You are an expert developer assistant specializing in generating high-quality, well-documented code. ";

const PHP_INSTRUCTION: &str = "Generate only PHP code with clear comments. Follow WordPress best practices and coding standards. Do not include explanations outside of code comments. Ensure the code is secure, efficient, and properly documented with PHPDoc comments where appropriate.";
const JAVASCRIPT_INSTRUCTION: &str = "Generate only JavaScript code with clear comments. Follow modern ES6+ best practices. Do not include explanations outside of code comments. Ensure the code is secure, efficient, and properly documented with JSDoc comments where appropriate.";
const PYTHON_INSTRUCTION: &str = "Generate only Python code with clear comments. Follow PEP 8 style guidelines. Do not include explanations outside of code comments. Ensure the code is secure, efficient, and properly documented with docstrings where appropriate.";
const NODEJS_INSTRUCTION: &str = "Generate only Node.js code with clear comments. Follow modern ES6+ best practices. Do not include explanations outside of code comments. Ensure the code is secure, efficient, and properly documented with JSDoc comments where appropriate.";
const GENERIC_INSTRUCTION: &str = "Generate only code with clear comments. Do not include explanations outside of code comments. Ensure the code is secure, efficient, and properly documented.";
const TEXT_INSTRUCTION: &str =
    "You are a helpful AI assistant that provides clear and concise responses.";

/// Validation errors for [`Language`] tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageValidationError {
    /// The tag was blank.
    #[error("language must not be empty")]
    Empty,
    /// The tag contained characters outside `[a-z0-9_+-]`.
    #[error("language tag contains unsupported characters")]
    InvalidCharacters,
}

/// A language tag attached to prompts, snippets and history.
///
/// # Examples
/// ```
/// use devassist::domain::Language;
///
/// let lang = Language::parse("JavaScript").expect("valid tag");
/// assert_eq!(lang, Language::JavaScript);
/// assert_eq!(lang.file_extension(), "js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    /// PHP source.
    Php,
    /// Browser JavaScript.
    JavaScript,
    /// Python source.
    Python,
    /// Server-side JavaScript.
    NodeJs,
    /// Free-form prose; never recorded in history.
    Text,
    /// Any other well-formed tag.
    Other(String),
}

impl Language {
    /// Parse a tag case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, LanguageValidationError> {
        let tag = raw.trim().to_ascii_lowercase();
        if tag.is_empty() {
            return Err(LanguageValidationError::Empty);
        }
        if !tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '+'))
        {
            return Err(LanguageValidationError::InvalidCharacters);
        }
        Ok(match tag.as_str() {
            "php" => Self::Php,
            "javascript" => Self::JavaScript,
            "python" => Self::Python,
            "nodejs" => Self::NodeJs,
            "text" => Self::Text,
            _ => Self::Other(tag),
        })
    }

    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Php => "php",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::NodeJs => "nodejs",
            Self::Text => "text",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// Fixed system instruction sent with completions in this language.
    pub fn system_prompt(&self) -> String {
        let suffix = match self {
            Self::Text => return TEXT_INSTRUCTION.to_owned(),
            Self::Php => PHP_INSTRUCTION,
            Self::JavaScript => JAVASCRIPT_INSTRUCTION,
            Self::Python => PYTHON_INSTRUCTION,
            Self::NodeJs => NODEJS_INSTRUCTION,
            Self::Other(_) => GENERIC_INSTRUCTION,
        };
        format!("{BASE_INSTRUCTION}{suffix}")
    }

    /// Extension used when exporting code in this language.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::JavaScript | Self::NodeJs => "js",
            Self::Python => "py",
            Self::Text | Self::Other(_) => "txt",
        }
    }

    /// Whether completions in this language are recorded in history.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Language {
    type Error = LanguageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.as_str().to_owned()
    }
}
