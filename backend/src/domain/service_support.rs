//! Port-error mapping and completion plumbing shared by the domain services.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ChatTurn, CodeFileStore, CodeFileStoreError, CompletionRequest, HistoryRepository,
    HistoryRepositoryError, LlmClient, LlmClientError, PhpSyntaxChecker, PhpSyntaxCheckerError,
    SettingsRepository, SettingsRepositoryError, SyntaxCheck,
};
use crate::domain::{DeploymentPaths, Error, Language, NewHistoryEntry, Options, Secret};

pub(crate) const API_KEY_MISSING: &str =
    "API key is not set. Please configure your Anthropic Claude API key in the settings.";
pub(crate) const INVALID_PHP: &str = "Invalid PHP code. Please check for syntax errors.";

pub(crate) fn map_settings_error(error: SettingsRepositoryError) -> Error {
    match error {
        SettingsRepositoryError::Connection { message } => {
            Error::internal(format!("settings repository unavailable: {message}"))
        }
        SettingsRepositoryError::Query { message } => {
            Error::internal(format!("settings repository error: {message}"))
        }
        SettingsRepositoryError::Corrupt { message } => {
            Error::internal(format!("stored settings are unreadable: {message}"))
        }
    }
}

pub(crate) fn map_llm_error(error: LlmClientError) -> Error {
    match error {
        LlmClientError::Upstream { status, message } => {
            Error::upstream(message).with_details(json!({ "status": status }))
        }
        LlmClientError::Timeout { .. } => {
            Error::upstream("The language model did not respond in time.")
        }
        LlmClientError::Transport { message } => Error::upstream(message),
        LlmClientError::Decode { message } => {
            Error::upstream(format!("Unexpected response from the language model: {message}"))
        }
    }
}

pub(crate) fn map_file_store_error(error: CodeFileStoreError) -> Error {
    match error {
        CodeFileStoreError::NotFound { path } => {
            Error::not_found(format!("File does not exist: {path}"))
        }
        CodeFileStoreError::Io { path, message } => {
            Error::filesystem(format!("File operation failed for {path}"))
                .with_details(json!({ "path": path, "reason": message }))
        }
    }
}

fn map_checker_error(error: PhpSyntaxCheckerError) -> Error {
    match error {
        PhpSyntaxCheckerError::Unavailable { message } => {
            Error::not_configured(format!("PHP syntax checker unavailable: {message}"))
        }
        PhpSyntaxCheckerError::Io { message } => {
            Error::filesystem(format!("PHP syntax check could not run: {message}"))
        }
    }
}

/// Lint `code`, turning a failed parse into a validation error for `field`.
pub(crate) async fn ensure_valid_php<C>(checker: &C, code: &str, field: &str) -> Result<(), Error>
where
    C: PhpSyntaxChecker + ?Sized,
{
    match checker.check(code).await.map_err(map_checker_error)? {
        SyntaxCheck::Valid => Ok(()),
        SyntaxCheck::Invalid { output } => Err(Error::invalid_request(INVALID_PHP).with_details(
            json!({ "field": field, "code": "php_syntax", "output": output }),
        )),
    }
}

pub(crate) async fn load_options<S>(settings: &S) -> Result<Options, Error>
where
    S: SettingsRepository + ?Sized,
{
    settings.load().await.map_err(map_settings_error)
}

pub(crate) fn require_api_key(options: &Options) -> Result<Secret, Error> {
    if options.api_key.is_set() {
        Ok(options.api_key.clone())
    } else {
        Err(Error::not_configured(API_KEY_MISSING))
    }
}

/// Send `prompt` after `history` with the instruction for `language`.
pub(crate) async fn complete<L>(
    llm: &L,
    api_key: Secret,
    language: &Language,
    history: Vec<ChatTurn>,
    prompt: &str,
) -> Result<String, Error>
where
    L: LlmClient + ?Sized,
{
    let mut messages = history;
    messages.push(ChatTurn::user(prompt));
    let request = CompletionRequest {
        api_key,
        system: language.system_prompt(),
        messages,
    };
    llm.complete(&request)
        .await
        .map(|completion| completion.text)
        .map_err(map_llm_error)
}

pub(crate) fn map_history_error(error: HistoryRepositoryError) -> Error {
    match error {
        HistoryRepositoryError::Connection { message } => {
            Error::internal(format!("history repository unavailable: {message}"))
        }
        HistoryRepositoryError::Query { message } => {
            Error::internal(format!("history repository error: {message}"))
        }
    }
}

/// Store a successful completion and trim to the retention limit.
///
/// Only non-`text` languages are kept. Failures are logged, never returned:
/// the completion has already been paid for.
pub(crate) async fn record_history<H>(
    repo: &H,
    options: &Options,
    language: &Language,
    prompt: &str,
    response: &str,
) where
    H: HistoryRepository + ?Sized,
{
    if !language.is_recorded() {
        return;
    }
    let entry = NewHistoryEntry {
        prompt: prompt.to_owned(),
        response: response.to_owned(),
        language: language.clone(),
    };
    if let Err(error) = repo.insert(&entry).await {
        warn!(%error, "failed to record generation history");
        return;
    }
    let keep = options.max_history_items;
    match repo.trim_to(keep).await {
        Ok(removed) if removed > 0 => debug!(removed, keep = keep.get(), "trimmed history"),
        Ok(_) => {}
        Err(error) => warn!(%error, "failed to trim generation history"),
    }
}

/// Copy `original` into the backups directory before it is modified.
pub(crate) async fn back_up<F>(
    store: &F,
    paths: &DeploymentPaths,
    original: &Path,
    timestamp: i64,
) -> Result<PathBuf, Error>
where
    F: CodeFileStore + ?Sized,
{
    let target = paths.backup_path_for(original, timestamp);
    let backup = store.copy(original, &target).await.map_err(|error| {
        let name = original
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Error::filesystem(format!("Failed to create backup of {name}"))
            .with_details(json!({ "reason": error.to_string() }))
    })?;
    info!(original = %original.display(), backup = %backup.display(), "created backup");
    Ok(backup)
}

pub(crate) fn missing_field(field: &str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": "missing" }))
}
