//! HTTP host for the chess play service.

pub mod config;
pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use game_manager::{GameService, InMemorySessionStore, MoveOrchestrator};
use random_engine::RandomEngine;
use tracing::{info, warn};
use uci_engine::{Engine, EngineCommand, UciEngine, locate_engine};

use crate::config::{EngineConfig, EngineKind, ServerConfig};

pub use config::ConfigError;
pub use routes::{AppState, router};

/// Start the configured engine. A UCI engine that cannot be found or does
/// not complete its handshake is fatal.
pub async fn start_engine(config: &EngineConfig) -> anyhow::Result<Arc<dyn Engine>> {
    match config.kind {
        EngineKind::Random => {
            warn!("Using the random-move engine");
            Ok(Arc::new(RandomEngine::new()))
        }
        EngineKind::Uci => {
            let path: PathBuf = locate_engine(config.path.as_deref()).with_context(|| {
                match &config.path {
                    Some(p) => format!("engine not found at {} or in any known location", p.display()),
                    None => "no UCI engine found; set STOCKFISH_PATH or engine.path".to_string(),
                }
            })?;
            info!(path = %path.display(), "Starting UCI engine");
            let command = EngineCommand::new(path).with_args(config.args.clone());
            let engine = UciEngine::initialize(command, config.startup_timeout())
                .await
                .context("engine failed to start")?;
            Ok(Arc::new(engine))
        }
    }
}

/// Wire store, engine and orchestrator into a service.
pub fn build_service(config: &ServerConfig, engine: Arc<dyn Engine>) -> GameService {
    let orchestrator = MoveOrchestrator::new(Arc::new(InMemorySessionStore::new()), engine)
        .with_base_budget(config.engine.move_time());
    GameService::new(orchestrator).with_eval_depth(config.engine.eval_depth)
}
