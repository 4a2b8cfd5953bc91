//! Locating an engine binary on the host.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Binary name searched for on `PATH`.
pub const ENGINE_BINARY: &str = "stockfish";

/// Install locations checked after `PATH`.
pub const WELL_KNOWN_LOCATIONS: &[&str] = &[
    "/usr/games/stockfish",
    "/usr/bin/stockfish",
    "/usr/local/bin/stockfish",
    "/opt/homebrew/bin/stockfish",
];

/// Resolve the engine executable.
///
/// An explicit path wins when it points at an executable. Otherwise the
/// binary is looked up on `PATH`, then in the well-known locations.
pub fn locate_engine(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if is_executable(path) {
            return Some(path.to_path_buf());
        }
        debug!(path = %path.display(), "Configured engine path is not executable");
    }

    if let Some(found) = env::var_os("PATH").and_then(|p| search_path(ENGINE_BINARY, &p)) {
        return Some(found);
    }

    WELL_KNOWN_LOCATIONS
        .iter()
        .map(PathBuf::from)
        .find(|p| is_executable(p))
}

/// First executable named `binary` in a `PATH`-style list.
pub fn search_path(binary: &str, path_list: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_list)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod discovery_tests;
