//! Process-backed [`Engine`] speaking UCI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chess_core::{Position, UciMove};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use crate::error::EngineError;
use crate::process::{EngineCommand, SearchReply, UciProcess};
use crate::protocol::{go_depth, go_movetime, set_position};
use crate::strength::{Strength, StrengthSettings};
use crate::time_control::{DEFAULT_ANALYSIS_TIMEOUT, MoveBudget};
use crate::{Engine, EngineMove};

/// Default window for the startup handshake.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

const QUIT_GRACE: Duration = Duration::from_secs(1);

/// One long-lived engine process shared by every game.
///
/// All requests go through a single lock, so analyses never interleave. A
/// request that hits a protocol or I/O fault tears the process down and
/// fails; the next request starts a fresh process from the same command.
pub struct UciEngine {
    command: EngineCommand,
    startup_timeout: Duration,
    analysis_timeout: Duration,
    name: String,
    process: Mutex<Option<UciProcess>>,
    closed: AtomicBool,
}

impl UciEngine {
    /// Start the engine. Fails if it cannot be spawned or does not finish
    /// the handshake within `startup_timeout`.
    #[instrument(skip_all, fields(program = %command.program.display()))]
    pub async fn initialize(
        command: EngineCommand,
        startup_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let process = UciProcess::spawn(&command, startup_timeout).await?;
        let name = process
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| command.program.display().to_string());
        info!(engine = %name, "UCI engine initialized");

        Ok(Self {
            command,
            startup_timeout,
            analysis_timeout: DEFAULT_ANALYSIS_TIMEOUT,
            name,
            process: Mutex::new(Some(process)),
            closed: AtomicBool::new(false),
        })
    }

    pub fn with_analysis_timeout(mut self, analysis_timeout: Duration) -> Self {
        self.analysis_timeout = analysis_timeout;
        self
    }

    /// Configure, set up the position and run one search under the lock.
    async fn run_search(
        &self,
        position: &Position,
        settings: StrengthSettings,
        go: String,
        deadline: Duration,
    ) -> Result<SearchReply, EngineError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EngineError::Unavailable);
        }

        let mut guard = self.process.lock().await;
        // Shutdown may have run while this request waited for the lock
        if self.closed.load(Ordering::SeqCst) {
            return Err(EngineError::Unavailable);
        }
        if guard.is_none() {
            warn!("Engine process not running, restarting it");
            *guard = Some(UciProcess::spawn(&self.command, self.startup_timeout).await?);
        }
        let Some(process) = guard.as_mut() else {
            return Err(EngineError::Unavailable);
        };

        let search = async {
            for command in settings.uci_commands() {
                process.send(&command).await?;
            }
            process.sync().await?;
            process.send(&set_position(&position.fen())).await?;
            process.search(&go).await
        };
        let result = match timeout(deadline, search).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(deadline)),
        };

        if let Err(e) = &result {
            error!(error = %e, "Engine fault, discarding process");
            if let Some(mut broken) = guard.take() {
                broken.kill().await;
            }
        }
        result
    }
}

#[async_trait]
impl Engine for UciEngine {
    #[instrument(skip(self, position), fields(fen = %position.fen(), rating = strength.rating()))]
    async fn request_move(
        &self,
        position: &Position,
        strength: Strength,
        base_budget: Duration,
    ) -> Result<EngineMove, EngineError> {
        let budget = MoveBudget::new(base_budget);
        let think = budget.for_strength(strength);
        debug!(budget_ms = think.as_millis() as u64, "Requesting engine move");

        let reply = self
            .run_search(
                position,
                strength.settings(),
                go_movetime(think.as_millis()),
                budget.reply_deadline(strength),
            )
            .await?;

        let best = reply.best_move.ok_or(EngineError::NoMove)?;
        let mv = best
            .parse::<UciMove>()
            .ok()
            .filter(|mv| position.is_legal(mv))
            .ok_or_else(|| EngineError::IllegalMove {
                mv: best.clone(),
                fen: position.fen(),
            })?;
        let evaluation = reply
            .score
            .and_then(|s| s.white_relative(position.side_to_move()).centipawns());

        debug!(%mv, ?evaluation, "Engine move");
        Ok(EngineMove { mv, evaluation })
    }

    #[instrument(skip(self, position), fields(fen = %position.fen()))]
    async fn evaluate(&self, position: &Position, depth: u8) -> Result<Option<i32>, EngineError> {
        let reply = self
            .run_search(
                position,
                Strength::FULL.settings(),
                go_depth(depth),
                self.analysis_timeout,
            )
            .await?;
        Ok(reply
            .score
            .and_then(|s| s.white_relative(position.side_to_move()).centipawns()))
    }

    async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(process) = self.process.lock().await.take() {
            process.quit(QUIT_GRACE).await;
            info!(engine = %self.name, "Engine shut down");
        }
    }

    fn is_ready(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
