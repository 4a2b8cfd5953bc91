//! Server configuration.
//!
//! Layers, later ones winning: built-in defaults, an optional TOML file,
//! environment variables, command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// External UCI process.
    Uci,
    /// In-process random mover, no binary needed.
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub kind: EngineKind,
    /// Explicit executable. Discovered on the host when unset.
    pub path: Option<PathBuf>,
    pub args: Vec<String>,
    /// Base thinking time per engine move.
    pub move_time_ms: u64,
    pub startup_timeout_ms: u64,
    /// Depth used by the evaluation endpoint when the request names none.
    pub eval_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::Uci,
            path: None,
            args: Vec::new(),
            move_time_ms: 200,
            startup_timeout_ms: 10_000,
            eval_depth: 15,
        }
    }
}

impl EngineConfig {
    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time_ms)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS origins; `*` allows any.
    pub allowed_origins: Vec<String>,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults, overlaid with `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply `PORT`, `ALLOWED_ORIGINS` and `STOCKFISH_PATH`. Unparsable or
    /// empty values are ignored.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("PORT").and_then(|p| p.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(origins) = var("ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
            if !origins.is_empty() {
                self.allowed_origins = origins;
            }
        }
        if let Some(path) = var("STOCKFISH_PATH").filter(|p| !p.trim().is_empty()) {
            self.engine.path = Some(PathBuf::from(path));
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
