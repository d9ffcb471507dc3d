//! Tic-tac-toe core - game rules and perfect-play AI
//!
//! This crate provides:
//! - Board model (3x3 value-type grid, cells, actions)
//! - Turn order, legal actions and transitions
//! - Winner detection, terminal check and utility
//! - Minimax search with alpha-beta pruning

pub mod board;
pub mod game;
pub mod ai;
pub mod position;

// Re-exports for convenient access
pub use board::{Action, Board, Cell, ParseBoardError, Player, BOARD_SIZE, CELL_COUNT};
pub use game::{
    actions, initial_state, legal_actions, outcome, player, ply, result, terminal, utility,
    winner, InvalidAction, InvalidActionKind, Outcome, WINNING_LINES,
};
pub use ai::{minimax, MinimaxAI, SearchResult};
pub use position::Position;
