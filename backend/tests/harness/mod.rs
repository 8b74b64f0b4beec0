//! Shared wiring for HTTP integration tests.
//!
//! Builds the production services over in-memory repositories, a
//! temporary directory tree, a wiremock model endpoint and a pinned clock.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use devassist::domain::ports::FixturePhpSyntaxChecker;
use devassist::domain::{
    CodeAssistantService, CodeDeploymentService, DeploymentPaths, ErrorDebuggerService, Options,
    PluginGenerationService, Secret, SettingsService, SnippetService, SourceHostingService,
};
use devassist::inbound::http::auth::AdminToken;
use devassist::inbound::http::routes::api_scope;
use devassist::inbound::http::state::HttpState;
use devassist::outbound::filesystem::{CapStdCodeFileStore, CapStdPluginWorkspace};
use devassist::outbound::llm::{AnthropicHttpClient, AnthropicModelSettings};
use devassist::outbound::memory::{
    MemoryHistoryRepository, MemorySettingsRepository, MemorySnippetRepository,
};
use devassist::outbound::source_hosting::GitHubHttpClient;
use devassist::test_support::FixedClock;
use mockable::Clock;
use reqwest::Url;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ADMIN_TOKEN: &str = "integration-admin-token";
/// 2024-01-01T00:00:00Z.
pub const NOW: i64 = 1_704_067_200;

/// One wired application plus the resources it writes to.
pub struct Harness {
    pub state: HttpState,
    pub llm: MockServer,
    pub root: TempDir,
}

impl Harness {
    /// Wire every service with injection enabled and an API key configured.
    pub async fn start() -> Self {
        let llm = MockServer::start().await;
        let root = tempfile::tempdir().expect("tempdir");
        let paths = DeploymentPaths {
            plugins_root: root.path().join("plugins"),
            uploads_root: root.path().join("uploads"),
            theme_functions_path: root.path().join("theme/functions.php"),
        };
        let options = Options {
            api_key: Secret::new("sk-integration"),
            enable_php_injection: true,
            ..Options::default()
        };

        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_timestamp(NOW));
        let endpoint = Url::parse(&format!("{}/v1/messages", llm.uri())).expect("endpoint");
        let model = Arc::new(
            AnthropicHttpClient::new(
                endpoint,
                Duration::from_secs(5),
                AnthropicModelSettings::default(),
            )
            .expect("llm client"),
        );
        let github = Arc::new(
            GitHubHttpClient::new(
                Url::parse(&llm.uri()).expect("github base"),
                Duration::from_secs(5),
            )
            .expect("github client"),
        );
        let settings = Arc::new(MemorySettingsRepository::new(options));
        let files = Arc::new(CapStdCodeFileStore);
        let checker = Arc::new(FixturePhpSyntaxChecker);
        let history = Arc::new(MemoryHistoryRepository::new(clock.clone()));

        let state = HttpState {
            assistant: Arc::new(CodeAssistantService::new(
                model.clone(),
                history.clone(),
                settings.clone(),
            )),
            snippets: Arc::new(SnippetService::new(Arc::new(MemorySnippetRepository::new(
                clock.clone(),
            )))),
            plugins: Arc::new(PluginGenerationService::new(
                model.clone(),
                Arc::new(CapStdPluginWorkspace::new(paths.plugins_root.clone())),
                history.clone(),
                settings.clone(),
            )),
            debugger: Arc::new(ErrorDebuggerService::new(
                model,
                files.clone(),
                checker.clone(),
                history,
                settings.clone(),
                paths.clone(),
                clock.clone(),
            )),
            deployment: Arc::new(CodeDeploymentService::new(
                files,
                checker,
                settings.clone(),
                paths,
                clock,
            )),
            settings: Arc::new(SettingsService::new(settings.clone())),
            source_hosting: Arc::new(SourceHostingService::new(github, settings)),
        };

        Self { state, llm, root }
    }

    /// Answer the next model call(s) with `text`.
    pub async fn reply_with(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": text }]
            })))
            .mount(&self.llm)
            .await;
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(web::Data::new(AdminToken::new(Secret::new(ADMIN_TOKEN))))
            .service(api_scope())
    }
}

pub fn admin_post(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}")))
        .set_json(body)
}

pub fn admin_get(uri: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}")))
}
