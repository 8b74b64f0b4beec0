//! Builders for the HTTP state from settings and persistence adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use devassist::domain::ports::{HistoryRepository, SettingsRepository, SnippetRepository};
use devassist::domain::{
    CodeAssistantService, CodeDeploymentService, ErrorDebuggerService, PluginGenerationService,
    SettingsService, SnippetService, SourceHostingService,
};
use devassist::inbound::http::state::HttpState;
use devassist::outbound::filesystem::{CapStdCodeFileStore, CapStdPluginWorkspace};
use devassist::outbound::llm::AnthropicHttpClient;
use devassist::outbound::memory::{
    MemoryHistoryRepository, MemorySettingsRepository, MemorySnippetRepository,
};
use devassist::outbound::persistence::{
    DbPool, DieselHistoryRepository, DieselSettingsRepository, DieselSnippetRepository,
};
use devassist::outbound::php_lint::ProcessPhpLinter;
use devassist::outbound::source_hosting::GitHubHttpClient;

use super::config::{AppSettings, SettingsError};

/// Outbound adapters that do not depend on the persistence choice.
struct Adapters {
    llm: Arc<AnthropicHttpClient>,
    github: Arc<GitHubHttpClient>,
    files: Arc<CapStdCodeFileStore>,
    linter: Arc<ProcessPhpLinter>,
    workspace: Arc<CapStdPluginWorkspace>,
    clock: Arc<dyn Clock>,
}

/// Errors raised while assembling the state.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

fn build_adapters(settings: &AppSettings) -> Result<Adapters, StateBuildError> {
    let paths = settings.deployment_paths();
    Ok(Adapters {
        llm: Arc::new(AnthropicHttpClient::new(
            settings.llm_endpoint()?,
            settings.llm_timeout(),
            settings.llm_model_settings(),
        )?),
        github: Arc::new(GitHubHttpClient::new(
            settings.github_api_base()?,
            settings.github_timeout(),
        )?),
        files: Arc::new(CapStdCodeFileStore),
        linter: Arc::new(ProcessPhpLinter::new(settings.php_binary())),
        workspace: Arc::new(CapStdPluginWorkspace::new(paths.plugins_root)),
        clock: Arc::new(DefaultClock),
    })
}

fn assemble<Sn, H, St>(
    settings: &AppSettings,
    adapters: Adapters,
    snippets: Arc<Sn>,
    history: Arc<H>,
    options: Arc<St>,
) -> HttpState
where
    Sn: SnippetRepository + 'static,
    H: HistoryRepository + 'static,
    St: SettingsRepository + 'static,
{
    let Adapters {
        llm,
        github,
        files,
        linter,
        workspace,
        clock,
    } = adapters;
    let paths = settings.deployment_paths();

    HttpState {
        assistant: Arc::new(CodeAssistantService::new(
            llm.clone(),
            history.clone(),
            options.clone(),
        )),
        snippets: Arc::new(SnippetService::new(snippets)),
        plugins: Arc::new(
            PluginGenerationService::new(
                llm.clone(),
                workspace,
                history.clone(),
                options.clone(),
            )
            .with_limits(settings.parse_limits()),
        ),
        debugger: Arc::new(ErrorDebuggerService::new(
            llm,
            files.clone(),
            linter.clone(),
            history,
            options.clone(),
            paths.clone(),
            clock.clone(),
        )),
        deployment: Arc::new(CodeDeploymentService::new(
            files,
            linter,
            options.clone(),
            paths,
            clock,
        )),
        settings: Arc::new(SettingsService::new(options.clone())),
        source_hosting: Arc::new(SourceHostingService::new(github, options)),
    }
}

/// Build the HTTP state, backed by PostgreSQL when a pool is supplied and by
/// in-memory repositories otherwise.
pub fn build_http_state(
    settings: &AppSettings,
    pool: Option<DbPool>,
) -> Result<HttpState, StateBuildError> {
    let adapters = build_adapters(settings)?;
    let state = match pool {
        Some(pool) => assemble(
            settings,
            adapters,
            Arc::new(DieselSnippetRepository::new(pool.clone())),
            Arc::new(DieselHistoryRepository::new(pool.clone())),
            Arc::new(DieselSettingsRepository::new(pool)),
        ),
        None => {
            info!("no database configured; using in-memory repositories");
            let clock = adapters.clock.clone();
            assemble(
                settings,
                adapters,
                Arc::new(MemorySnippetRepository::new(clock.clone())),
                Arc::new(MemoryHistoryRepository::new(clock)),
                Arc::new(MemorySettingsRepository::default()),
            )
        }
    };
    Ok(state)
}
