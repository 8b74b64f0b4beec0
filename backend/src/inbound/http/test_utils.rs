//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};

use crate::domain::Secret;
use crate::domain::ports::{
    MockCodeAssistant, MockCodeDeployment, MockErrorDebugger, MockPluginGenerator,
    MockSettingsAdmin, MockSnippetCatalog, MockSourceHosting,
};
use crate::inbound::http::auth::AdminToken;
use crate::inbound::http::routes::api_scope;
use crate::inbound::http::state::HttpState;

/// Admin token accepted by [`test_app`].
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// Mock ports for one handler test; unset ports reject every call.
#[derive(Default)]
pub struct MockPorts {
    pub assistant: MockCodeAssistant,
    pub snippets: MockSnippetCatalog,
    pub plugins: MockPluginGenerator,
    pub debugger: MockErrorDebugger,
    pub deployment: MockCodeDeployment,
    pub settings: MockSettingsAdmin,
    pub source_hosting: MockSourceHosting,
}

impl From<MockPorts> for HttpState {
    fn from(ports: MockPorts) -> Self {
        Self {
            assistant: Arc::new(ports.assistant),
            snippets: Arc::new(ports.snippets),
            plugins: Arc::new(ports.plugins),
            debugger: Arc::new(ports.debugger),
            deployment: Arc::new(ports.deployment),
            settings: Arc::new(ports.settings),
            source_hosting: Arc::new(ports.source_hosting),
        }
    }
}

/// App with the full `/api/v1` surface over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(AdminToken::new(Secret::new(TEST_ADMIN_TOKEN))))
        .service(api_scope())
}

/// POST request carrying the admin token and a JSON body.
pub fn admin_post(uri: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {TEST_ADMIN_TOKEN}")))
        .set_json(body)
}

/// GET request carrying the admin token.
pub fn admin_get(uri: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {TEST_ADMIN_TOKEN}")))
}
