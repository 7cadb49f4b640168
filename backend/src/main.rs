//! Backend entry-point: loads settings, prepares storage and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let mut config = ServerConfig::new(settings.bind_addr()?)
        .with_cors_allowed_origins(settings.cors_allowed_origins());
    if let Some(path) = settings.seed_users() {
        config = config.with_seed_users(path);
    }

    if let Some(pool_config) = settings.pool_config() {
        let applied = run_pending_migrations(pool_config.database_url())
            .await
            .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    info!(addr = %settings.bind_addr()?, "listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
