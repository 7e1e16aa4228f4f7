mod cli;
mod dataset;
mod job;
mod npuzzle;
mod point24;
mod prompt;
mod record;
mod scoring;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use puzzles::types::ExtractionMode;

#[derive(Parser)]
#[command(name = "datagen", version, about = "Puzzle dataset generation and reward scoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate dataset shards from a job file.
    Generate { job: PathBuf },
    /// Parse a job file and echo the resolved configuration.
    Inspect { job: PathBuf },
    /// Score model responses against a dataset shard.
    Score {
        /// Dataset shard (JSON lines) the responses answer.
        #[arg(long)]
        dataset: PathBuf,
        /// Responses file (JSON lines of `{index, response}`).
        #[arg(long)]
        responses: PathBuf,
        /// Answer extraction mode.
        #[arg(long, value_enum, default_value_t = ModeArg::Strict)]
        mode: ModeArg,
        /// Where to write the score report (default: `scores.json` next to
        /// the responses file).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Strict,
    Flexible,
}

impl From<ModeArg> for ExtractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => ExtractionMode::Strict,
            ModeArg::Flexible => ExtractionMode::Flexible,
        }
    }
}

/// Dev diagnostics via `RUST_LOG` (default `warn`), compact on stderr so
/// shard data and result lines on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Generate { job } => cli::generate(&job),
        Command::Inspect { job } => cli::inspect(&job),
        Command::Score {
            dataset,
            responses,
            mode,
            out,
        } => cli::score(&dataset, &responses, mode.into(), out.as_deref()),
    }
}
