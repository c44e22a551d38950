//! Accounts server entry-point: loads settings, wires adapters and serves
//! the GraphQL endpoint.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::health::HealthState;
use accounts::inbound::http::state::HttpState;
use accounts::settings::{AppSettings, BuildMode};
use ortho_config::OrthoConfig;

use server::{ServerConfig, build_account_service, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let mode = BuildMode::from_debug_assertions();

    let config = ServerConfig::from_settings(&settings, mode)?;
    let accounts = build_account_service(&settings, mode).await?;
    let health_state = web::Data::new(HealthState::new());

    info!(bind_addr = %config.bind_addr(), "starting accounts server");
    let server = create_server(health_state, HttpState::new(accounts), config)?;
    server.await
}
