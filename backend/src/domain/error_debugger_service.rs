//! Error debugging and patching service.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CodeFileStore, ErrorDebugger, HistoryRepository, LlmClient, PatchOutcome, PatchRequest,
    PhpSyntaxChecker, SettingsRepository,
};
use crate::domain::service_support::{
    back_up, complete, ensure_valid_php, load_options, map_file_store_error, missing_field,
    record_history, require_api_key,
};
use crate::domain::{
    DeploymentPaths, Error, ErrorAnalysis, ErrorReport, Language, build_debug_prompt,
};

/// Service implementing [`ErrorDebugger`].
#[derive(Clone)]
pub struct ErrorDebuggerService<L, F, C, H, S> {
    llm: Arc<L>,
    files: Arc<F>,
    checker: Arc<C>,
    history_repo: Arc<H>,
    settings_repo: Arc<S>,
    paths: DeploymentPaths,
    clock: Arc<dyn Clock>,
}

impl<L, F, C, H, S> ErrorDebuggerService<L, F, C, H, S> {
    /// Create a new service.
    pub fn new(
        llm: Arc<L>,
        files: Arc<F>,
        checker: Arc<C>,
        history_repo: Arc<H>,
        settings_repo: Arc<S>,
        paths: DeploymentPaths,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            llm,
            files,
            checker,
            history_repo,
            settings_repo,
            paths,
            clock,
        }
    }
}

#[async_trait]
impl<L, F, C, H, S> ErrorDebugger for ErrorDebuggerService<L, F, C, H, S>
where
    L: LlmClient,
    F: CodeFileStore,
    C: PhpSyntaxChecker,
    H: HistoryRepository,
    S: SettingsRepository,
{
    async fn analyse(&self, report: ErrorReport) -> Result<ErrorAnalysis, Error> {
        if report.message.trim().is_empty() {
            return Err(missing_field("error_message", "Missing required error message."));
        }
        let options = load_options(self.settings_repo.as_ref()).await?;
        let api_key = require_api_key(&options)?;

        let prompt = build_debug_prompt(&report);
        let reply = complete(self.llm.as_ref(), api_key, &Language::Php, Vec::new(), &prompt).await?;
        record_history(self.history_repo.as_ref(), &options, &Language::Php, &prompt, &reply).await;

        let analysis = ErrorAnalysis::from_reply(&reply);
        if analysis.section_count() == 0 {
            return Err(Error::parse_failure(
                "Failed to parse error analysis from AI response.",
            ));
        }
        Ok(analysis)
    }

    async fn patch(&self, request: PatchRequest) -> Result<PatchOutcome, Error> {
        let file = request.file.trim();
        if file.is_empty() {
            return Err(missing_field("error_file", "Invalid file path or file does not exist."));
        }
        if request.code_fix.trim().is_empty() {
            return Err(missing_field("code_fix", "No code fix provided."));
        }
        let path = PathBuf::from(file);
        if !self.files.exists(&path).await.map_err(map_file_store_error)? {
            return Err(Error::invalid_request("Invalid file path or file does not exist.")
                .with_details(json!({ "field": "error_file", "code": "not_found" })));
        }
        ensure_valid_php(self.checker.as_ref(), &request.code_fix, "code_fix").await?;

        let timestamp = self.clock.utc().timestamp();
        let backup = back_up(self.files.as_ref(), &self.paths, &path, timestamp).await?;
        self.files
            .write(&path, &request.code_fix)
            .await
            .map_err(map_file_store_error)?;
        info!(file = %path.display(), "patched file");

        Ok(PatchOutcome {
            file_path: path.display().to_string(),
            backup_path: backup.display().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "error_debugger_service_tests.rs"]
mod tests;
