//! Best command - search a single position
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_position(), report()

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use serde::Serialize;

use tictactoe_core::{outcome, player, terminal, Action, Board, MinimaxAI, Outcome, Player, Position};

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["board", "position"])))]
pub struct BestArgs {
    /// Board text, e.g. "XX./O../..."
    #[arg(long)]
    pub board: Option<String>,

    /// Position file (JSON or board text)
    #[arg(long, value_name = "FILE")]
    pub position: Option<PathBuf>,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Search result for one position
#[derive(Debug, Serialize)]
struct BestReport {
    name: Option<String>,
    board: Board,
    to_move: Option<Player>,
    outcome: Outcome,
    action: Option<Action>,
    value: i8,
    nodes_expanded: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: BestArgs, seed: Option<u64>) -> Result<()> {
    let position = load_position(&args)?;
    let board = position.board;

    let mut ai = match seed {
        Some(s) => MinimaxAI::with_seed(s),
        None => MinimaxAI::new(),
    };
    let search = ai.search(&board);

    let report = BestReport {
        name: position.name,
        board,
        to_move: (!terminal(&board)).then(|| player(&board)),
        outcome: outcome(&board),
        action: search.action,
        value: search.value,
        nodes_expanded: search.nodes_expanded,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_position(args: &BestArgs) -> Result<Position> {
    if let Some(path) = &args.position {
        return Position::load(path)
            .with_context(|| format!("Failed to load position: {}", path.display()));
    }

    let text = args.board.as_deref().unwrap_or_default();
    let board: Board = text
        .parse()
        .with_context(|| format!("Failed to parse board: {:?}", text))?;
    Ok(Position::new(board))
}

fn print_text_report(report: &BestReport) {
    if let Some(name) = &report.name {
        println!("Position: {}", name);
    }
    println!("Board:    {}", report.board);

    match (report.to_move, report.action) {
        (Some(to_move), Some(action)) => {
            println!("To move:  {}", to_move);
            println!("Best:     {}", action);
            println!("Value:    {}", report.value);
            println!("Nodes:    {}", report.nodes_expanded);
        }
        _ => println!("Game over: {:?}", report.outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(board: &str) -> BestArgs {
        BestArgs {
            board: Some(board.to_string()),
            position: None,
            json: false,
        }
    }

    #[test]
    fn test_load_position_from_text() {
        let position = load_position(&args("XX./.O./...")).unwrap();
        assert_eq!(position.board.to_string(), "XX./.O./...");
        assert_eq!(position.name, None);
    }

    #[test]
    fn test_load_position_rejects_bad_text() {
        let err = load_position(&args("XX")).unwrap_err();
        assert!(err.to_string().contains("Failed to parse board"));
    }

    #[test]
    fn test_run_on_terminal_board() {
        assert!(run(args("XOX/XOO/OXX"), Some(1)).is_ok());
    }
}
