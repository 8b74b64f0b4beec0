//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed domain entities and the use-case services
//! that operate on them. Types here know nothing about HTTP, SQL or the
//! filesystem; those live behind the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Language, Snippet, HistoryEntry, Options: persisted entities.
//! - PluginBlueprint, PluginFiles, ErrorAnalysis: generation and debugging
//!   artefacts derived from model replies.
//! - `*Service` types: implementations of the driving ports.

pub mod error;
pub mod ports;

mod code_assistant_service;
mod code_deployment_service;
mod deployment;
mod error_analysis;
mod error_debugger_service;
mod fenced;
mod history;
mod language;
mod plugin_files;
mod plugin_generation_service;
mod plugin_prompt;
mod secret;
mod service_support;
mod settings;
mod settings_service;
mod slug;
mod snippet;
mod snippet_service;
mod source_hosting;
mod source_hosting_service;
mod trace_id;

pub use self::code_assistant_service::{CONNECTION_PROBE, CodeAssistantService};
pub use self::code_deployment_service::CodeDeploymentService;
pub use self::deployment::{
    APPEND_MARKER, BACKUPS_DIR, DeploymentPaths, EXPORTS_DIR, InjectionTarget, append_code,
    backup_file_name, custom_file_name, export_file_name, extract_target_comment,
    new_plugin_header, new_plugin_name, new_plugin_source,
};
pub use self::error::{Error, ErrorCode};
pub use self::error_analysis::{
    AnalysisHtml, AnalysisSection, ErrorAnalysis, ErrorReport, build_debug_prompt,
    parse_can_patch,
};
pub use self::error_debugger_service::ErrorDebuggerService;
pub use self::fenced::{FencedBlocks, RawFileBlock, scan_file_blocks, scan_sections};
pub use self::history::{HistoryEntry, NewHistoryEntry, RetentionLimit};
pub use self::language::{Language, LanguageValidationError};
pub use self::plugin_files::{
    DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_FILES, ParseLimits, PluginFiles, PluginFilesError,
    RelativeFilePath, RelativePathError, parse_plugin_files,
};
pub use self::plugin_generation_service::PluginGenerationService;
pub use self::plugin_prompt::{PluginBlueprint, PluginFeature, build_plugin_prompt};
pub use self::secret::Secret;
pub use self::settings::{
    Options, OptionsUpdate, OptionsValidationError, OptionsView, SecretStatus,
};
pub use self::settings_service::SettingsService;
pub use self::slug::{MAX_SLUG_LEN, PluginSlug, SlugValidationError};
pub use self::snippet::{MAX_TITLE_CHARS, NewSnippet, Snippet, SnippetValidationError};
pub use self::snippet_service::SnippetService;
pub use self::source_hosting::{
    Commit, CommitQuery, DEFAULT_BRANCH, FileCommit, FileContent, FileRef, FileWrite, Gist,
    GistFile, HostedUser, NewGist, Repository, branch_or_default,
};
pub use self::source_hosting_service::SourceHostingService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use devassist::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
