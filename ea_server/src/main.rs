//! HTTP API server for the esports arena platform.
//!
//! Wires the database-backed wallet, coin request, notification, and
//! tournament managers into an axum REST API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use ctrlc::set_handler;
use ea_server::{api, config::ServerConfig, logging, metrics};
use esports_arena::{
    db::Database, notifications::NotificationManager, requests::RequestManager,
    tournament::TournamentManager, wallet::WalletManager,
};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Run the esports arena API server

USAGE:
  ea_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or sqlite://arena.db]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             SQLite connection string
  METRICS_BIND             Prometheus exporter bind address (optional)
  RUST_LOG                 Log filter (default: info,sqlx=warn,hyper=warn)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let database_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, database_url_override)?;
    info!("Starting esports arena server at {}", config.bind);

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(Error::msg)?;
        info!("Prometheus metrics exposed on {metrics_bind}");
    }

    info!("Connecting to database: {}", config.database.database_url);
    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {e}"))?;
    db.migrate()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to apply schema: {e}"))?;
    info!("Database connected and schema applied");

    // Create managers
    let pool = Arc::new(db.pool().clone());
    let wallet = Arc::new(WalletManager::new(pool.clone()));
    let notifications = Arc::new(NotificationManager::new(pool.clone()));
    let tournaments = Arc::new(TournamentManager::new(
        pool.clone(),
        wallet.clone(),
        notifications.clone(),
    ));
    let requests = Arc::new(RequestManager::new(
        pool.clone(),
        wallet.clone(),
        notifications.clone(),
        tournaments.clone(),
    ));

    let state = api::AppState {
        wallet,
        notifications,
        requests,
        tournaments,
        pool,
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
