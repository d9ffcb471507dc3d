//! Tic-tac-toe CLI - command-line interface
//!
//! Commands:
//! - best: Find the optimal move for a position
//! - match: Play perfect-play self-play games

mod best_cmd;
mod match_cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use best_cmd::BestArgs;
use match_cmd::MatchArgs;

#[derive(Parser)]
#[command(name = "tictactoe")]
#[command(about = "Perfect-play tic-tac-toe engine")]
struct Cli {
    /// Seed for move tie-breaking (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the optimal move for a position
    Best(BestArgs),
    /// Play self-play games between two perfect players
    Match(MatchArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Best(args) => best_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
