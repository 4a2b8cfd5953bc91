//! A running UCI engine process and its line I/O.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::EngineError;
use crate::protocol::{EngineLine, Score, parse_line};

/// How to launch an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl EngineCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Answer to a `go` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReply {
    pub best_move: Option<String>,
    /// Last score reported before `bestmove`, relative to the side to move.
    pub score: Option<Score>,
}

pub struct UciProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    name: Option<String>,
    options: Vec<String>,
}

impl UciProcess {
    /// Spawn the engine and complete the `uci` / `isready` handshake within
    /// `startup`.
    #[instrument(skip_all, fields(program = %command.program.display()))]
    pub async fn spawn(command: &EngineCommand, startup: Duration) -> Result<Self, EngineError> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: command.program.display().to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Handshake("engine stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Handshake("engine stdout not captured".into()))?;

        let mut process = Self {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
            name: None,
            options: Vec::new(),
        };

        match timeout(startup, process.handshake()).await {
            Ok(Ok(())) => {
                info!(
                    name = process.name().unwrap_or("unknown"),
                    options = process.options.len(),
                    "Engine ready"
                );
                Ok(process)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Engine handshake failed");
                process.kill().await;
                Err(e)
            }
            Err(_) => {
                warn!(?startup, "Engine did not complete handshake in time");
                process.kill().await;
                Err(EngineError::Timeout(startup))
            }
        }
    }

    async fn handshake(&mut self) -> Result<(), EngineError> {
        self.send("uci").await?;
        loop {
            match parse_line(&self.read_line().await?) {
                EngineLine::Id { key, value } if key == "name" => self.name = Some(value),
                EngineLine::Option(option) => self.options.push(option),
                EngineLine::UciOk => break,
                _ => {}
            }
        }
        self.sync().await
    }

    /// Name the engine reported in `id name`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub async fn send(&mut self, command: &str) -> Result<(), EngineError> {
        trace!(command, "-> engine");
        self.stdin.write_all(command.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    pub async fn read_line(&mut self) -> Result<String, EngineError> {
        let line = self
            .lines
            .next_line()
            .await?
            .ok_or(EngineError::Terminated)?;
        trace!(line = %line, "<- engine");
        Ok(line)
    }

    /// `isready` round trip: everything sent before it has been processed.
    pub async fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready").await?;
        loop {
            if parse_line(&self.read_line().await?) == EngineLine::ReadyOk {
                return Ok(());
            }
        }
    }

    /// Send a `go` command and read until `bestmove`.
    pub async fn search(&mut self, go: &str) -> Result<SearchReply, EngineError> {
        self.send(go).await?;
        let mut score = None;
        loop {
            match parse_line(&self.read_line().await?) {
                EngineLine::Info { score: Some(s), .. } => score = Some(s),
                EngineLine::BestMove { mv, .. } => {
                    return Ok(SearchReply {
                        best_move: mv,
                        score,
                    });
                }
                _ => {}
            }
        }
    }

    /// Ask the engine to exit, killing it if it does not within `grace`.
    pub async fn quit(mut self, grace: Duration) {
        if self.send("quit").await.is_ok()
            && let Ok(Ok(status)) = timeout(grace, self.child.wait()).await
        {
            debug!(%status, "Engine exited");
            return;
        }
        self.kill().await;
    }

    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!(error = %e, "Engine kill failed (already exited?)");
        }
    }
}
