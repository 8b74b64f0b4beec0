//! Code generation service.
//!
//! Every call reads the options bag afresh so key rotation and retention
//! changes apply without a restart.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CodeAssistant, GenerateCodeRequest, GeneratedCode, HistoryRepository, LlmClient,
    SettingsRepository,
};
use crate::domain::service_support::{
    complete, load_options, map_history_error, missing_field, record_history, require_api_key,
};
use crate::domain::{Error, HistoryEntry, Language};

/// Probe prompt used by [`CodeAssistant::test_connection`].
pub const CONNECTION_PROBE: &str =
    "Respond with \"Connection successful\" if you can read this message.";

/// Service implementing [`CodeAssistant`].
#[derive(Clone)]
pub struct CodeAssistantService<L, H, S> {
    llm: Arc<L>,
    history_repo: Arc<H>,
    settings_repo: Arc<S>,
}

impl<L, H, S> CodeAssistantService<L, H, S> {
    /// Create a new service.
    pub fn new(llm: Arc<L>, history_repo: Arc<H>, settings_repo: Arc<S>) -> Self {
        Self {
            llm,
            history_repo,
            settings_repo,
        }
    }
}

#[async_trait]
impl<L, H, S> CodeAssistant for CodeAssistantService<L, H, S>
where
    L: LlmClient,
    H: HistoryRepository,
    S: SettingsRepository,
{
    async fn generate(&self, request: GenerateCodeRequest) -> Result<GeneratedCode, Error> {
        if request.prompt.trim().is_empty() {
            return Err(missing_field("prompt", "prompt must not be empty"));
        }
        let options = load_options(self.settings_repo.as_ref()).await?;
        if !options.accepts_language(&request.language) {
            return Err(Error::invalid_request(format!(
                "Language {} is not enabled.",
                request.language
            ))
            .with_details(json!({ "field": "language", "code": "language_not_enabled" })));
        }
        let api_key = require_api_key(&options)?;

        let content = complete(
            self.llm.as_ref(),
            api_key,
            &request.language,
            request.history,
            &request.prompt,
        )
        .await?;

        record_history(
            self.history_repo.as_ref(),
            &options,
            &request.language,
            &request.prompt,
            &content,
        )
        .await;

        Ok(GeneratedCode {
            content,
            language: request.language,
        })
    }

    async fn test_connection(&self) -> Result<String, Error> {
        let options = load_options(self.settings_repo.as_ref()).await?;
        let api_key = require_api_key(&options)?;
        complete(
            self.llm.as_ref(),
            api_key,
            &Language::Text,
            Vec::new(),
            CONNECTION_PROBE,
        )
        .await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, Error> {
        self.history_repo.list().await.map_err(map_history_error)
    }
}

#[cfg(test)]
#[path = "code_assistant_service_tests.rs"]
mod tests;
