//! chess_server
//!
//! Serves the play API over HTTP against a UCI engine.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chess_server::config::{EngineKind, ServerConfig};
use chess_server::{AppState, build_service, router, start_engine};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play chess against a UCI engine over HTTP
#[derive(Parser, Debug)]
#[command(name = "chess_server", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(long)]
    port: Option<u16>,

    /// UCI engine executable
    #[arg(long)]
    engine_path: Option<PathBuf>,

    /// Play random moves instead of running an engine
    #[arg(long)]
    random_engine: bool,
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = &self.engine_path {
            config.engine.path = Some(path.clone());
        }
        if self.random_engine {
            config.engine.kind = EngineKind::Random;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,chess_server=debug,game_manager=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    cli.apply(&mut config);
    info!(?config, "Starting chess server");

    let engine = start_engine(&config.engine).await?;
    info!(engine = engine.name(), "Engine ready");

    let state = AppState {
        service: Arc::new(build_service(&config, Arc::clone(&engine))),
    };
    let app = router(state, &config);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Listening on http://{}", listener.local_addr()?);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Shutting down");
    engine.shutdown().await;
    served.context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
