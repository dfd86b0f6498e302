use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use shiftdesk_core::config::ShiftdeskConfig;
use shiftdesk_gateway::app;
use shiftdesk_store::Database;
use tracing::info;

/// Shiftdesk workforce scheduling API server.
#[derive(Debug, Parser)]
#[command(name = "shiftdesk-gateway", version)]
struct Args {
    /// Path to shiftdesk.toml (default: ~/.shiftdesk/shiftdesk.toml)
    #[arg(long, env = "SHIFTDESK_CONFIG")]
    config: Option<String>,

    /// Override `server.bind`
    #[arg(long)]
    bind: Option<String>,

    /// Override `server.port`
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shiftdesk_gateway=info,shiftdesk_scheduler=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = ShiftdeskConfig::load(args.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(code = e.code(), "Config load failed ({}), using defaults", e);
        ShiftdeskConfig::default()
    });

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);

    if let Err(e) = config.ensure_data_dir() {
        tracing::error!(code = e.code(), path = %config.database.path, "cannot create data directory");
        return Err(e.into());
    }
    info!(path = %config.database.path, "opening SQLite database");
    let db = Database::open(&config.database.path)?;

    let provider = shiftdesk_agent::build_provider(&config.providers);
    if provider.is_none() {
        tracing::warn!("No AI provider configured; schedules will use the built-in balancer");
    }

    let state = Arc::new(app::AppState::new(config, db, provider));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Shiftdesk gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
