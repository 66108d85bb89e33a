mod uci;

pub use uci::UciEngine;

use rbc_core::model::chess_move::Move;
use rbc_core::model::position::Position;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the engine executable.
pub const ENGINE_ENV: &str = "STOCKFISH_EXECUTABLE";

/// Recommends a move for a fully known position.
///
/// Failures are recoverable: the caller restarts the oracle and moves on.
pub trait Oracle {
    /// Best move for the side to move within `limit`, or `None` when the
    /// oracle reports that no move exists.
    fn best_move(&mut self, position: &Position, limit: Duration)
    -> Result<Option<Move>, OracleError>;

    /// Tears down any running process and starts a fresh one.
    fn restart(&mut self) -> Result<(), OracleError>;

    /// Releases the underlying process. Safe to call more than once.
    fn shutdown(&mut self) {}
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no engine executable configured (set STOCKFISH_EXECUTABLE)")]
    NotConfigured,
    #[error("failed to launch engine {path:?}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("engine process is not running")]
    NotRunning,
    #[error("engine closed its output")]
    Terminated,
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected engine reply: {0}")]
    Protocol(String),
}

/// Where to find the engine and how to invoke it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub path: Option<PathBuf>,
    pub args: Vec<String>,
}

impl EngineConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            args: Vec::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path = read(ENGINE_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);
        Self {
            path,
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Keeps `self.path` when set, otherwise falls back to `other`'s.
    pub fn or(self, other: EngineConfig) -> Self {
        match self.path {
            Some(_) => self,
            None => Self {
                path: other.path,
                args: if self.args.is_empty() {
                    other.args
                } else {
                    self.args
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ENGINE_ENV, EngineConfig};
    use std::path::PathBuf;

    #[test]
    fn reads_engine_path_from_reader() {
        let config = EngineConfig::from_reader(|key| {
            (key == ENGINE_ENV).then(|| " /opt/stockfish ".to_string())
        });
        assert_eq!(config.path, Some(PathBuf::from("/opt/stockfish")));
    }

    #[test]
    fn blank_path_is_unset() {
        let config = EngineConfig::from_reader(|_| Some("   ".to_string()));
        assert_eq!(config.path, None);
    }

    #[test]
    fn explicit_path_wins_over_fallback() {
        let explicit = EngineConfig::new("/usr/bin/sf");
        let merged = explicit.clone().or(EngineConfig::new("/other"));
        assert_eq!(merged, explicit);

        let merged = EngineConfig::default().or(EngineConfig::new("/other"));
        assert_eq!(merged.path, Some(PathBuf::from("/other")));
    }
}
