//! Match command - perfect-play self-play games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use tictactoe_core::{initial_state, outcome, result, Action, Board, MinimaxAI, Outcome};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Starting board (defaults to the empty board)
    #[arg(long)]
    pub start: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    outcome: Outcome,
    moves: Vec<Action>,
    nodes_expanded: u64,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    avg_moves: f32,
    avg_nodes: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the starting board
/// 2. Play the games in parallel
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let start = match &args.start {
        Some(text) => text
            .parse::<Board>()
            .with_context(|| format!("Failed to parse start board: {:?}", text))?,
        None => initial_state(),
    };

    tracing::info!("Starting match: {} games from {}", args.games, start);

    let results = play_match(start, args.games, seed);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games. Each game gets its own AI and seed.
fn play_match(start: Board, games: usize, seed: Option<u64>) -> MatchResults {
    let mut rng = create_rng(seed);
    let seeds: Vec<u64> = (0..games).map(|_| rng.gen()).collect();

    let records: Vec<GameRecord> = seeds
        .into_par_iter()
        .enumerate()
        .map(|(i, game_seed)| {
            let record = play_single_game(start, i + 1, game_seed);
            tracing::info!(
                "Game {}: {:?} in {} moves ({} nodes)",
                record.game_number,
                record.outcome,
                record.moves.len(),
                record.nodes_expanded
            );
            record
        })
        .collect();

    compute_match_statistics(records)
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(start: Board, game_number: usize, seed: u64) -> GameRecord {
    let mut ai = MinimaxAI::with_seed(seed);
    let mut board = start;
    let mut moves = Vec::new();
    let mut nodes_expanded = 0;

    loop {
        let search = ai.search(&board);
        nodes_expanded += search.nodes_expanded;
        let Some(action) = search.action else {
            break;
        };
        match result(&board, action) {
            Ok(next) => board = next,
            Err(e) => {
                tracing::warn!("Game {}: {}", game_number, e);
                break;
            }
        }
        moves.push(action);
    }

    GameRecord {
        game_number,
        outcome: outcome(&board),
        moves,
        nodes_expanded,
    }
}

fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |o: Outcome| games.iter().filter(|g| g.outcome == o).count();
    let x_wins = count(Outcome::WinX);
    let o_wins = count(Outcome::WinO);
    let draws = count(Outcome::Draw);

    let (avg_moves, avg_nodes) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
        let total_nodes: u64 = games.iter().map(|g| g.nodes_expanded).sum();
        (
            total_moves as f32 / games.len() as f32,
            total_nodes as f32 / games.len() as f32,
        )
    };

    MatchResults {
        games,
        x_wins,
        o_wins,
        draws,
        avg_moves,
        avg_nodes,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(n: usize, total: usize) -> f32 {
    if total > 0 {
        n as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        outcome: Outcome,
        moves: Vec<Action>,
        nodes_expanded: u64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        x_wins: usize,
        o_wins: usize,
        draws: usize,
        avg_moves: f32,
        avg_nodes: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        x_wins: results.x_wins,
        o_wins: results.o_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        avg_nodes: results.avg_nodes,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                outcome: g.outcome,
                moves: g.moves.clone(),
                nodes_expanded: g.nodes_expanded,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("X wins:      {} ({:.1}%)", results.x_wins, percent(results.x_wins, total));
    println!("O wins:      {} ({:.1}%)", results.o_wins, percent(results.o_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:   {:.1}", results.avg_moves);
    println!("Avg nodes:   {:.0}", results.avg_nodes);

    println!("\nGame details:");
    for game in &results.games {
        let moves: Vec<String> = game.moves.iter().map(|a| a.to_string()).collect();
        println!(
            "  Game {}: {:?} - {}",
            game.game_number,
            game.outcome,
            moves.join(" ")
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(game_number: usize, outcome: Outcome, moves: usize, nodes: u64) -> GameRecord {
        GameRecord {
            game_number,
            outcome,
            moves: vec![Action::new(0, 0); moves],
            nodes_expanded: nodes,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.x_wins, 0);
        assert_eq!(results.o_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, Outcome::WinX, 5, 100),
            record(2, Outcome::Draw, 9, 200),
            record(3, Outcome::Draw, 7, 300),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.x_wins, 1);
        assert_eq!(results.o_wins, 0);
        assert_eq!(results.draws, 2);
        assert_eq!(results.avg_moves, 7.0);
        assert_eq!(results.avg_nodes, 200.0);
    }

    #[test]
    fn test_perfect_play_match_is_all_draws() {
        let results = play_match(initial_state(), 4, Some(42));
        assert_eq!(results.games.len(), 4);
        assert_eq!(results.draws, 4);
        assert!(results.games.iter().all(|g| g.moves.len() == 9));
    }

    #[test]
    fn test_match_from_terminal_start() {
        let start: Board = "XXX/OO./...".parse().unwrap();
        let results = play_match(start, 2, Some(1));
        assert_eq!(results.x_wins, 2);
        assert!(results.games.iter().all(|g| g.moves.is_empty()));
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
