//! The mutable options bag shared by every feature.
//!
//! A single row holds the options. Reads fall back to [`Options::default`]
//! when nothing is stored yet; updates merge only the supplied keys.

use serde::Serialize;

use super::{Language, RetentionLimit, Secret};

/// Validation errors raised when merging an [`OptionsUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsValidationError {
    /// `max_history_items` was zero.
    #[error("max_history_items must be at least 1")]
    MaxHistoryItems,
    /// `enabled_languages` was empty.
    #[error("enabled_languages must not be empty")]
    NoEnabledLanguages,
}

impl OptionsValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MaxHistoryItems => "max_history_items",
            Self::NoEnabledLanguages => "enabled_languages",
        }
    }
}

/// Stored options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Language-model provider key.
    pub api_key: Secret,
    /// Source-hosting personal access token.
    pub github_access_token: Secret,
    /// Gate for every PHP injection.
    pub enable_php_injection: bool,
    /// Language preselected by clients.
    pub default_language: Language,
    /// Languages accepted by code generation.
    pub enabled_languages: Vec<Language>,
    /// History retention.
    pub max_history_items: RetentionLimit,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_key: Secret::default(),
            github_access_token: Secret::default(),
            enable_php_injection: false,
            default_language: Language::Php,
            enabled_languages: vec![
                Language::Php,
                Language::JavaScript,
                Language::Python,
                Language::NodeJs,
            ],
            max_history_items: RetentionLimit::DEFAULT,
        }
    }
}

impl Options {
    /// Whether code generation accepts `language`.
    ///
    /// Free-form text is always accepted.
    ///
    /// # Examples
    /// ```
    /// use devassist::domain::{Language, Options};
    ///
    /// let options = Options::default();
    /// assert!(options.accepts_language(&Language::Python));
    /// assert!(options.accepts_language(&Language::Text));
    /// assert!(!options.accepts_language(&Language::parse("rust").expect("tag")));
    /// ```
    pub fn accepts_language(&self, language: &Language) -> bool {
        matches!(language, Language::Text) || self.enabled_languages.contains(language)
    }

    /// Merge `update` into a copy of these options.
    pub fn merged(&self, update: OptionsUpdate) -> Result<Self, OptionsValidationError> {
        let mut next = self.clone();
        if let Some(api_key) = update.api_key {
            next.api_key = api_key;
        }
        if let Some(token) = update.github_access_token {
            next.github_access_token = token;
        }
        if let Some(enabled) = update.enable_php_injection {
            next.enable_php_injection = enabled;
        }
        if let Some(language) = update.default_language {
            next.default_language = language;
        }
        if let Some(languages) = update.enabled_languages {
            if languages.is_empty() {
                return Err(OptionsValidationError::NoEnabledLanguages);
            }
            let mut unique: Vec<Language> = Vec::with_capacity(languages.len());
            for language in languages {
                if !unique.contains(&language) {
                    unique.push(language);
                }
            }
            next.enabled_languages = unique;
        }
        if let Some(max) = update.max_history_items {
            next.max_history_items =
                RetentionLimit::new(max).ok_or(OptionsValidationError::MaxHistoryItems)?;
        }
        Ok(next)
    }

    /// Secret-free projection for responses.
    pub fn view(&self) -> OptionsView {
        OptionsView {
            api_key: SecretStatus::of(&self.api_key),
            github_access_token: SecretStatus::of(&self.github_access_token),
            enable_php_injection: self.enable_php_injection,
            default_language: self.default_language.clone(),
            enabled_languages: self.enabled_languages.clone(),
            max_history_items: self.max_history_items.get(),
        }
    }
}

/// Partial update; `None` leaves a key unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsUpdate {
    /// New provider key; an empty value clears it.
    pub api_key: Option<Secret>,
    /// New access token; an empty value clears it.
    pub github_access_token: Option<Secret>,
    /// New injection gate.
    pub enable_php_injection: Option<bool>,
    /// New default language.
    pub default_language: Option<Language>,
    /// New enabled language list.
    pub enabled_languages: Option<Vec<Language>>,
    /// New retention limit.
    pub max_history_items: Option<u32>,
}

/// Whether a secret is present, without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecretStatus {
    /// A non-empty value is stored.
    pub configured: bool,
}

impl SecretStatus {
    fn of(secret: &Secret) -> Self {
        Self {
            configured: secret.is_set(),
        }
    }
}

/// Options as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionsView {
    /// Provider key presence.
    pub api_key: SecretStatus,
    /// Access token presence.
    pub github_access_token: SecretStatus,
    /// Injection gate.
    pub enable_php_injection: bool,
    /// Default language.
    pub default_language: Language,
    /// Enabled languages.
    pub enabled_languages: Vec<Language>,
    /// Retention limit.
    pub max_history_items: u32,
}
