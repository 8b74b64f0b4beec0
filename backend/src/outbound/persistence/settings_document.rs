//! JSON document stored in the `settings.options` column.
//!
//! Missing keys fall back to the activation defaults so older rows keep
//! loading after new options are introduced.

use serde::{Deserialize, Serialize};

use crate::domain::{Language, Options, RetentionLimit, Secret};

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct OptionsDocument {
    pub api_key: String,
    pub github_access_token: String,
    pub enable_php_injection: bool,
    pub default_language: String,
    pub enabled_languages: Vec<String>,
    pub max_history_items: u32,
}

impl Default for OptionsDocument {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

impl From<&Options> for OptionsDocument {
    fn from(options: &Options) -> Self {
        Self {
            api_key: options.api_key.expose().to_owned(),
            github_access_token: options.github_access_token.expose().to_owned(),
            enable_php_injection: options.enable_php_injection,
            default_language: options.default_language.as_str().to_owned(),
            enabled_languages: options
                .enabled_languages
                .iter()
                .map(|language| language.as_str().to_owned())
                .collect(),
            max_history_items: options.max_history_items.get(),
        }
    }
}

impl TryFrom<OptionsDocument> for Options {
    type Error = String;

    fn try_from(document: OptionsDocument) -> Result<Self, Self::Error> {
        let default_language = Language::parse(&document.default_language)
            .map_err(|error| format!("default_language: {error}"))?;
        let enabled_languages = document
            .enabled_languages
            .iter()
            .map(|raw| Language::parse(raw).map_err(|error| format!("enabled_languages: {error}")))
            .collect::<Result<Vec<_>, _>>()?;
        let max_history_items = RetentionLimit::new(document.max_history_items)
            .ok_or_else(|| "max_history_items must be at least 1".to_owned())?;
        Ok(Self {
            api_key: Secret::new(document.api_key),
            github_access_token: Secret::new(document.github_access_token),
            enable_php_injection: document.enable_php_injection,
            default_language,
            enabled_languages,
            max_history_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_documents_take_defaults() {
        let document: OptionsDocument =
            serde_json::from_value(json!({ "api_key": "sk-1", "enable_php_injection": true }))
                .expect("document decodes");
        let options = Options::try_from(document).expect("options convert");

        assert_eq!(options.api_key.expose(), "sk-1");
        assert!(options.enable_php_injection);
        assert_eq!(options.enabled_languages, Options::default().enabled_languages);
        assert_eq!(options.max_history_items.get(), 50);
    }

    #[test]
    fn zero_retention_is_corrupt() {
        let document: OptionsDocument =
            serde_json::from_value(json!({ "max_history_items": 0 })).expect("document decodes");
        assert!(Options::try_from(document).is_err());
    }

    #[test]
    fn documents_carry_every_option() {
        let options = Options {
            github_access_token: Secret::new("ghp_1"),
            max_history_items: RetentionLimit::new(5).expect("non-zero"),
            ..Options::default()
        };
        let value = serde_json::to_value(OptionsDocument::from(&options)).expect("serialises");
        assert_eq!(value["github_access_token"], "ghp_1");
        assert_eq!(value["max_history_items"], 5);
        assert_eq!(value["default_language"], "php");
    }
}
