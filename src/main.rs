use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use item_api::app::{app, AppState};
use item_api::config::{AppConfig, AuthMode};

#[derive(Parser)]
#[command(name = "item-api")]
#[command(about = "In-memory Item CRUD REST service")]
#[command(version)]
struct Args {
    #[arg(long, help = "Bind host (overrides ITEM_API_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Bind port (overrides ITEM_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "none, basic or bearer (overrides SECURITY_AUTH_MODE)")]
    auth_mode: Option<AuthMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECURITY_* and friends
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("item_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(mode) = args.auth_mode {
        config.security.auth_mode = mode;
    }

    if config.security.auth_mode == AuthMode::Bearer && config.security.jwt_secret.is_empty() {
        tracing::warn!("bearer auth is enabled but SECURITY_JWT_SECRET is empty; every /api request will be rejected");
    }

    tracing::info!(
        environment = ?config.environment,
        auth_mode = %config.security.auth_mode,
        seeded = config.store.seed_samples,
        "starting item-api"
    );

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("item-api listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(AppState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("item-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
