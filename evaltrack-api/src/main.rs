//! evaltrack-api - Evaluation tracking HTTP service
//!
//! Settings come from the command line, the environment, an optional TOML
//! file and built-in defaults, in that order.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use evaltrack_api::{build_router, AppState};
use evaltrack_common::config::{self, Config, Overrides, TomlConfig};
use evaltrack_common::db::init::{close_database, init_database};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for evaltrack-api
#[derive(Parser, Debug)]
#[command(name = "evaltrack-api")]
#[command(about = "Evaluation tracking HTTP service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "EVALTRACK_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "EVALTRACK_DATABASE")]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "EVALTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory with the front-end static files
    #[arg(long, env = "EVALTRACK_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Password required on /admin routes
    #[arg(long, env = "EVALTRACK_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

impl Args {
    fn load_config(self) -> Result<Config> {
        let file = match self.config.or_else(config::default_config_file) {
            Some(path) => {
                info!("Config file: {}", path.display());
                TomlConfig::load(&path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?
            }
            None => TomlConfig::default(),
        };

        let overrides = Overrides {
            port: self.port,
            database_path: self.database,
            static_dir: self.static_dir,
            admin_password: self.admin_password,
        };

        Ok(Config::resolve(overrides, file))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "evaltrack_api=info,evaltrack_common=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting evaltrack-api v{}", env!("CARGO_PKG_VERSION"));

    let config = Args::parse().load_config()?;
    info!("Database path: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    if config.admin_password.is_none() {
        warn!("Admin password not configured; /admin routes are open");
    }
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    let state = AppState::new(pool.clone(), config.admin_password.clone());
    let app = build_router(state, config.static_dir.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("evaltrack-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    close_database(pool).await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
