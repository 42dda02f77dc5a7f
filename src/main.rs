//! litebench binary entry point.
//!
//! Parses flags, opens and migrates the database, then serves HTTP until
//! SIGINT/SIGTERM. Any startup error is printed to stderr with exit code 1.

use clap::Parser;
use litebench::{
    config::{AppConfig, ConfigError, DatabaseConfig, DatabaseDriver, parse_duration},
    server::{AppState, create_router},
    storage::StorageBuilder,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// litebench - fake person records over SQLite or PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "litebench", version, about, long_about = None)]
struct Cli {
    /// Datasource name: database file for sqlite, URL for postgres
    #[arg(long, default_value = "", env = "LITEBENCH_DSN")]
    dsn: String,

    /// Bind address; ":port" listens on all interfaces
    #[arg(long, default_value = litebench::config::DEFAULT_ADDR, env = "LITEBENCH_ADDR")]
    addr: String,

    /// Database connector: sqlite or postgres
    #[arg(long = "db", default_value = "sqlite", env = "LITEBENCH_DB")]
    db: String,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = 5, env = "LITEBENCH_MAX_CONNECTIONS")]
    max_connections: u32,

    /// Connect attempts for postgres before giving up
    #[arg(long, default_value_t = 3, env = "LITEBENCH_CONNECT_RETRIES")]
    connect_retries: u32,

    /// Wait after the first failed connect; doubles each attempt
    #[arg(long, default_value = "5s", env = "LITEBENCH_CONNECT_BACKOFF")]
    connect_backoff: String,

    /// Environment variable holding the current deployment region
    #[arg(
        long,
        default_value = litebench::config::DEFAULT_REGION_ENV,
        env = "LITEBENCH_REGION_ENV"
    )]
    region_env: String,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig, ConfigError> {
        let connect_backoff = parse_duration(&self.connect_backoff)
            .map_err(|e| ConfigError::ValidationError(format!("connect_backoff: {e}")))?;

        let config = AppConfig {
            addr: self.addr,
            database: DatabaseConfig {
                dsn: self.dsn,
                driver: DatabaseDriver::parse_connector(&self.db)?,
                max_connections: self.max_connections,
                connect_attempts: self.connect_retries,
                connect_backoff,
            },
            region_env: self.region_env,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,litebench=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.into_config()?;
    let addr = config.bind_addr()?;

    tracing::info!(
        "Database: {} (max connections {})",
        config.database.driver,
        config.database.max_connections,
    );

    // Connect and migrate before accepting traffic
    let handles = StorageBuilder::new(config.database.driver, config.database.dsn.clone())
        .max_connections(config.database.max_connections)
        .connect_retry(config.database.options().retry)
        .build()
        .await?;

    tracing::info!("Database opened at {}", config.database.dsn);

    let shutdown = CancellationToken::new();
    let app_state = AppState::new(handles.persons.clone())
        .with_region_env(config.region_env.clone())
        .with_shutdown(shutdown.clone());

    let app = create_router(app_state);

    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            handles.shutdown().await;
            return Err(e.into());
        }
    };

    tracing::info!("HTTP server listening on: http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await;

    tracing::info!("Closing database...");
    handles.shutdown().await;

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight work.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }

    shutdown.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("litebench").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let config = parse(&["--dsn", "/tmp/db"]).into_config().unwrap();
        assert_eq!(config.addr, ":8080");
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.database.connect_attempts, 3);
        assert_eq!(config.region_env, "FLY_REGION");
    }

    #[test]
    fn test_cli_missing_dsn() {
        let err = parse(&[]).into_config().unwrap_err();
        assert_eq!(err.to_string(), "dsn required");
    }

    #[test]
    fn test_cli_postgres() {
        let config = parse(&[
            "--dsn",
            "postgres://u:p@db/app",
            "--db",
            "postgres",
            "--connect-backoff",
            "250ms",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.database.driver, DatabaseDriver::Postgres);
        assert_eq!(
            config.database.connect_backoff,
            std::time::Duration::from_millis(250)
        );
    }

    #[test]
    fn test_cli_unknown_connector() {
        let err = parse(&["--dsn", "x", "--db", "oracle"])
            .into_config()
            .unwrap_err();
        assert!(err.to_string().contains("unknown database connector"));
    }
}
