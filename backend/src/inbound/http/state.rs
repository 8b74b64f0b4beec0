//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CodeAssistant, CodeDeployment, ErrorDebugger, PluginGenerator, SettingsAdmin, SnippetCatalog,
    SourceHosting,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub assistant: Arc<dyn CodeAssistant>,
    pub snippets: Arc<dyn SnippetCatalog>,
    pub plugins: Arc<dyn PluginGenerator>,
    pub debugger: Arc<dyn ErrorDebugger>,
    pub deployment: Arc<dyn CodeDeployment>,
    pub settings: Arc<dyn SettingsAdmin>,
    pub source_hosting: Arc<dyn SourceHosting>,
}
