use super::{EngineConfig, Oracle, OracleError};
use rbc_core::model::chess_move::Move;
use rbc_core::model::position::Position;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;
use tracing::{Level, event};

struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl EngineProcess {
    fn spawn(path: &Path, args: &[String]) -> Result<Self, OracleError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| OracleError::Launch {
                path: path.to_path_buf(),
                source,
            })?;
        let stdin = child.stdin.take().ok_or(OracleError::NotRunning)?;
        let stdout = child.stdout.take().ok_or(OracleError::NotRunning)?;
        let mut process = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        };
        process.send("uci")?;
        process.read_until("uciok")?;
        process.send("isready")?;
        process.read_until("readyok")?;
        Ok(process)
    }

    fn send(&mut self, line: &str) -> Result<(), OracleError> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads lines until one starts with `prefix` and returns it.
    fn read_until(&mut self, prefix: &str) -> Result<String, OracleError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(OracleError::Terminated);
            }
            let trimmed = line.trim();
            if trimmed.starts_with(prefix) {
                return Ok(trimmed.to_string());
            }
        }
    }

    fn quit(mut self) {
        let _ = self.send("quit");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A UCI engine driven over piped stdio, one process at a time.
pub struct UciEngine {
    path: PathBuf,
    args: Vec<String>,
    process: Option<EngineProcess>,
}

impl UciEngine {
    /// Starts the engine and completes the UCI handshake.
    pub fn launch(config: &EngineConfig) -> Result<Self, OracleError> {
        let mut engine = Self::idle(config)?;
        engine.restart()?;
        Ok(engine)
    }

    /// Prepares an engine handle without starting the process.
    pub fn idle(config: &EngineConfig) -> Result<Self, OracleError> {
        let path = config.path.clone().ok_or(OracleError::NotConfigured)?;
        Ok(Self {
            path,
            args: config.args.clone(),
            process: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    fn query(
        process: &mut EngineProcess,
        position: &Position,
        limit: Duration,
    ) -> Result<Option<Move>, OracleError> {
        let millis = limit.as_millis().max(1);
        process.send(&format!("position fen {}", position.to_fen()))?;
        process.send(&format!("go movetime {millis}"))?;
        let reply = process.read_until("bestmove")?;
        parse_bestmove(&reply)
    }
}

fn parse_bestmove(reply: &str) -> Result<Option<Move>, OracleError> {
    let token = reply
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| OracleError::Protocol(reply.to_string()))?;
    if token == "(none)" {
        return Ok(None);
    }
    let mv: Move = token
        .parse()
        .map_err(|_| OracleError::Protocol(reply.to_string()))?;
    Ok(if mv.is_null() { None } else { Some(mv) })
}

impl Oracle for UciEngine {
    fn best_move(
        &mut self,
        position: &Position,
        limit: Duration,
    ) -> Result<Option<Move>, OracleError> {
        let process = self.process.as_mut().ok_or(OracleError::NotRunning)?;
        let result = Self::query(process, position, limit);
        if result.is_err() {
            // The stream may be mid-reply; never reuse it.
            if let Some(process) = self.process.take() {
                process.quit();
            }
        }
        result
    }

    fn restart(&mut self) -> Result<(), OracleError> {
        if let Some(process) = self.process.take() {
            process.quit();
        }
        event!(
            target: "rbc_bot::oracle",
            Level::DEBUG,
            path = %self.path.display(),
            "starting engine"
        );
        self.process = Some(EngineProcess::spawn(&self.path, &self.args)?);
        Ok(())
    }

    fn shutdown(&mut self) {
        if let Some(process) = self.process.take() {
            process.quit();
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
