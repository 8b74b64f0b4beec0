//! Actix server assembly.

mod config;
mod state_builders;

pub use config::AppSettings;
pub use state_builders::build_http_state;

use std::io;
use std::net::SocketAddr;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use devassist::Trace;
use devassist::domain::Secret;
use devassist::inbound::http::auth::AdminToken;
use devassist::inbound::http::health::{HealthState, live, ready};
use devassist::inbound::http::routes::api_scope;
use devassist::inbound::http::state::HttpState;

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_scope()).service(ready).service(live);
}

/// Bind `bind_addr` and start serving; flips `health` to ready once bound.
///
/// # Errors
/// Returns the bind error when the address is unavailable.
pub fn create_server(
    health: web::Data<HealthState>,
    http_state: HttpState,
    admin_token: Secret,
    bind_addr: SocketAddr,
) -> io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let admin_token = web::Data::new(AdminToken::new(admin_token));
    let probes = health.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(probes.clone())
            .app_data(http_state.clone())
            .app_data(admin_token.clone())
            .wrap(Trace)
            .configure(routes)
    })
    .bind(bind_addr)?
    .run();

    health.mark_ready();
    Ok(server)
}
