//! Service entry-point: loads settings, runs migrations and serves the API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use devassist::inbound::http::health::HealthState;
use devassist::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, build_http_state, create_server};

async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    let applied = run_pending_migrations(database_url)
        .await
        .map_err(|err| io::Error::other(format!("database migration failed: {err}")))?;
    info!(applied, "database migrations complete");
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| io::Error::other(format!("database pool setup failed: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let subscriber = fmt().with_env_filter(EnvFilter::from_default_env()).json();
    if let Err(error) = subscriber.try_init() {
        warn!(%error, "tracing subscriber already installed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let admin_token = settings.admin_token().map_err(io::Error::other)?;

    let pool = match settings.database_url.as_deref() {
        Some(url) => Some(connect_database(url).await?),
        None => None,
    };
    let http_state = build_http_state(&settings, pool).map_err(io::Error::other)?;

    let health = web::Data::new(HealthState::new());
    let server = create_server(health.clone(), http_state, admin_token, bind_addr)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;
    health.mark_draining();
    info!("server stopped");
    outcome
}
