//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `*Client`, [`PluginWorkspace`],
//! [`PhpSyntaxChecker`], [`CodeFileStore`]) are implemented by outbound
//! adapters. Driving ports ([`CodeAssistant`], [`SnippetCatalog`],
//! [`PluginGenerator`], [`ErrorDebugger`], [`CodeDeployment`],
//! [`SettingsAdmin`], [`SourceHosting`]) are implemented by domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod code_assistant;
mod code_deployment;
mod code_file_store;
mod error_debugger;
mod history_repository;
mod llm_client;
mod php_syntax_checker;
mod plugin_generator;
mod plugin_workspace;
mod settings_admin;
mod settings_repository;
mod snippet_catalog;
mod snippet_repository;
mod source_hosting;
mod source_hosting_client;

#[cfg(test)]
pub use code_assistant::MockCodeAssistant;
pub use code_assistant::{CodeAssistant, GenerateCodeRequest, GeneratedCode};
#[cfg(test)]
pub use code_deployment::MockCodeDeployment;
pub use code_deployment::{
    CodeDeployment, ExportOutcome, ExportRequest, InjectRequest, InjectionOutcome,
};
#[cfg(test)]
pub use code_file_store::MockCodeFileStore;
pub use code_file_store::{CodeFileStore, CodeFileStoreError};
#[cfg(test)]
pub use error_debugger::MockErrorDebugger;
pub use error_debugger::{ErrorDebugger, PatchOutcome, PatchRequest};
#[cfg(test)]
pub use history_repository::MockHistoryRepository;
pub use history_repository::{HistoryRepository, HistoryRepositoryError};
#[cfg(test)]
pub use llm_client::MockLlmClient;
pub use llm_client::{
    ChatRole, ChatTurn, Completion, CompletionRequest, FixtureLlmClient, LlmClient,
    LlmClientError,
};
#[cfg(test)]
pub use php_syntax_checker::MockPhpSyntaxChecker;
pub use php_syntax_checker::{
    FixturePhpSyntaxChecker, PhpSyntaxChecker, PhpSyntaxCheckerError, SyntaxCheck,
};
#[cfg(test)]
pub use plugin_generator::MockPluginGenerator;
pub use plugin_generator::{GeneratedPlugin, PluginGenerator};
#[cfg(test)]
pub use plugin_workspace::MockPluginWorkspace;
pub use plugin_workspace::{PluginWorkspace, PluginWorkspaceError};
#[cfg(test)]
pub use settings_admin::MockSettingsAdmin;
pub use settings_admin::SettingsAdmin;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
pub use settings_repository::{
    FixtureSettingsRepository, SettingsRepository, SettingsRepositoryError,
};
#[cfg(test)]
pub use snippet_catalog::MockSnippetCatalog;
pub use snippet_catalog::SnippetCatalog;
#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
pub use snippet_repository::{SnippetRepository, SnippetRepositoryError};
#[cfg(test)]
pub use source_hosting::MockSourceHosting;
pub use source_hosting::SourceHosting;
#[cfg(test)]
pub use source_hosting_client::MockSourceHostingClient;
pub use source_hosting_client::{SourceHostingClient, SourceHostingClientError};
