mod agents;
mod game;
mod report;

pub use agents::AgentError;
pub use game::{GameOutcome, play_game};
pub use report::{AgentRecord, Standings};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::{RngCore, SeedableRng, rngs::StdRng};
use rbc_core::model::color::Color;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_dir;
use agents::AgentBlueprint;

/// Plays the configured series of games between the two agents.
pub struct MatchRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub standings: Standings,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub histories_dir: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
}

impl MatchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        if agents.len() != 2 {
            return Err(RunnerError::AgentCount {
                found: agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if let Some(dir) = &self.outputs.histories_dir {
            fs::create_dir_all(dir)?;
        }

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let names: Vec<&str> = self.agents.iter().map(|a| a.name.as_str()).collect();
        let mut standings = Standings::new(&self.config.run_id, &names);
        let clock = Duration::from_secs_f64(self.config.games.seconds_per_player);
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let seating = self.seating(game_index);
            let mut white = self.agents[seating[0]].spawn_player(game_seed)?;
            let mut black = self.agents[seating[1]].spawn_player(game_seed.rotate_left(32))?;
            let seat_names = [names[seating[0]], names[seating[1]]];

            let outcome = play_game(
                [white.as_mut(), black.as_mut()],
                seat_names,
                clock,
                self.config.games.max_fullmoves,
            );
            standings.record(seating, outcome.winner, outcome.reason);

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "rbc_bench::match",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    white = seat_names[0],
                    black = seat_names[1],
                    result = %outcome.history.summary(),
                    elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0
                );
            }

            if let Some(dir) = &self.outputs.histories_dir {
                write_history(dir, game_index, &outcome)?;
            }

            let row = GameLogRow::new(&self.config.run_id, game_index, game_seed, seat_names, &outcome);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        writer.flush()?;
        standings.write_markdown(&self.outputs.summary_md)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| telemetry_dir(&self.outputs).join("telemetry.jsonl"));

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            standings,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            histories_dir: self.outputs.histories_dir.clone(),
            telemetry_path,
        })
    }

    /// Agent indices playing White and Black in game `game_index`.
    fn seating(&self, game_index: usize) -> [usize; 2] {
        if self.config.games.alternate_colors && game_index % 2 == 1 {
            [1, 0]
        } else {
            [0, 1]
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_history(dir: &Path, game_index: usize, outcome: &GameOutcome) -> Result<(), RunnerError> {
    let path = dir.join(format!("game_{game_index:04}.json"));
    fs::write(path, outcome.history.to_json()?)?;
    Ok(())
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_index: usize,
    game_seed: u64,
    white: String,
    black: String,
    winner: Option<String>,
    winner_color: Option<Color>,
    reason: Option<&'static str>,
    turns: usize,
    white_captures: usize,
    black_captures: usize,
    white_seconds_left: f64,
    black_seconds_left: f64,
    elapsed_ms: f64,
}

impl GameLogRow {
    fn new(
        run_id: &str,
        game_index: usize,
        game_seed: u64,
        names: [&str; 2],
        outcome: &GameOutcome,
    ) -> Self {
        let history = &outcome.history;
        Self {
            run_id: run_id.to_string(),
            game_index,
            game_seed,
            white: names[0].to_string(),
            black: names[1].to_string(),
            winner: outcome.winner.map(|color| names[color.index()].to_string()),
            winner_color: outcome.winner,
            reason: outcome.reason.map(|reason| reason.as_str()),
            turns: history.turn_count(),
            white_captures: history.captures_by(Color::White),
            black_captures: history.captures_by(Color::Black),
            white_seconds_left: outcome.seconds_left[0],
            black_seconds_left: outcome.seconds_left[1],
            elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize output: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("configuration requires exactly 2 agents but found {found}")]
    AgentCount { found: usize },
}
