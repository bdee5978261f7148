use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use doggy_meetup_api::config::AppConfig;
use doggy_meetup_api::database::DatabaseManager;
use doggy_meetup_api::{router, AppState};

/// Doggy Meetup API server
#[derive(Debug, Parser)]
#[command(name = "doggy-meetup-api", version, about)]
struct Cli {
    /// Interface to bind (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides API_PORT / PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// Do not apply database migrations on startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Doggy Meetup API in {:?} mode", config.environment);

    let bind_addr = format!("{}:{}", config.api.host, config.api.port);

    let state = if config.database.url.is_some() {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        if !cli.skip_migrations {
            DatabaseManager::migrate(&pool)
                .await
                .context("failed to apply migrations")?;
        }
        AppState::postgres(config, pool)
    } else {
        tracing::warn!("DATABASE_URL not set; using in-memory storage");
        AppState::in_memory(config)
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Doggy Meetup API listening on http://{}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
