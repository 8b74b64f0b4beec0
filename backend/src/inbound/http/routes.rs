//! Route table for the admin request surface.
//!
//! ```text
//! POST /api/v1/generate-code        GET  /api/v1/test-api-connection
//! GET  /api/v1/get-history          POST /api/v1/save-snippet
//! GET  /api/v1/get-snippets         POST /api/v1/delete-snippet
//! POST /api/v1/export-code          POST /api/v1/inject-php-code
//! POST /api/v1/generate-plugin      POST /api/v1/debug-error
//! POST /api/v1/patch-error          GET  /api/v1/settings
//! POST /api/v1/update-settings      /api/v1/github/...
//! ```

use actix_web::{Scope, web};

use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::{debugger, deployment, generation, github, plugins, settings, snippets};

/// Body size limit for JSON payloads; generated code and fixes can be large.
pub const JSON_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// JSON extractor configuration shared by every handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(json_error_handler)
}

/// All `/api/v1` handlers.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(json_config())
        .service(generation::generate_code)
        .service(generation::test_api_connection)
        .service(generation::get_history)
        .service(snippets::save_snippet)
        .service(snippets::get_snippets)
        .service(snippets::delete_snippet)
        .service(deployment::export_code)
        .service(deployment::inject_php_code)
        .service(plugins::generate_plugin)
        .service(debugger::debug_error)
        .service(debugger::patch_error)
        .service(settings::get_settings)
        .service(settings::update_settings)
        .service(github::scope())
}
