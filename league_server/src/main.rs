//! Tournament report server.
//!
//! Serves standings, team, roster and fixture reports as PDF or XLSX over a
//! JWT-protected REST API backed by PostgreSQL.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use league::{
    auth::AuthManager,
    db::{Database, PgReportStore, ReportStore},
    reports::ReportOrchestrator,
};
use league_server::{
    api,
    config::ServerConfig,
    logging, metrics,
};
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the tournament report server

USAGE:
  league_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:3000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret (at least 32 characters)
  PASSWORD_PEPPER          Password hashing pepper (at least 16 characters)
  JWT_EXPIRES_HOURS        Access token lifetime in hours [default: 24]
  REPORT_PAGE_BOTTOM       PDF content bottom in points [default: 700]
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  (See .env file for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
}

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

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    let config = ServerConfig::from_env(args.bind, args.database_url)?;
    config.validate()?;
    let flow = config.flow_config()?;

    logging::init();
    info!("Starting tournament report server at {}", config.bind);

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics exported on {}", metrics_bind);
    }

    let database = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    info!("Database connected successfully");

    let store: Arc<dyn ReportStore> = Arc::new(PgReportStore::new(
        database.pool().clone(),
        config.database.query_timeout(),
    ));
    let orchestrator = Arc::new(ReportOrchestrator::new(store, flow));
    let auth_manager = Arc::new(AuthManager::new(
        Arc::new(database.pool().clone()),
        config.security.password_pepper.clone(),
        config.security.jwt_secret.clone(),
        config.security.token_hours,
    ));

    let api_state = api::AppState {
        auth_manager,
        orchestrator,
        database: database.clone(),
    };
    let app = api::create_router(api_state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");
    database.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
