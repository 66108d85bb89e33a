use std::path::PathBuf;

use clap::Parser;

use rbc_bench::config::{BenchmarkConfig, ResolvedOutputs};
use rbc_bench::logging::init_logging;
use rbc_bench::tournament::MatchRunner;

/// Local match harness for reconnaissance blind chess agents.
#[derive(Debug, Parser)]
#[command(
    name = "rbc-bench",
    author,
    version,
    about = "Plays local reconnaissance blind chess matches between configured agents"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for the series.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let agent_names = config
        .agents
        .iter()
        .map(|agent| agent.name.as_str())
        .collect::<Vec<_>>()
        .join(" vs ");

    println!("Loaded configuration '{run_id}': {agent_names} over {games} game(s)");

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = MatchRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Match complete for '{run_id}': {} games, {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for agent in summary.standings.agents() {
        println!(
            "  {}: {} wins, {} losses, {} draws",
            agent.name, agent.wins, agent.losses, agent.draws
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(dir) = summary.histories_dir.as_ref() {
        println!("Game histories: {}", dir.display());
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
