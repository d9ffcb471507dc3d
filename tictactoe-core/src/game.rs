//! Turn order, move generation, transitions and outcome evaluation

use crate::board::{Action, Board, Cell, Player, CELL_COUNT};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Winning lines as flat cell indices, in scan order:
/// rows top to bottom, columns left to right, main diagonal, anti-diagonal.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

// ============================================================================
// TYPES
// ============================================================================

/// Game outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    WinX,
    WinO,
    Draw,
    InProgress,
}

/// Why an action was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidActionKind {
    /// A coordinate is outside [0, 2]
    OutOfRange,
    /// The target cell already holds a mark
    Occupied,
}

impl fmt::Display for InvalidActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidActionKind::OutOfRange => write!(f, "position is off the board"),
            InvalidActionKind::Occupied => write!(f, "cell is already occupied"),
        }
    }
}

/// Rejected transition
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid action {action} on board {board}: {kind}")]
pub struct InvalidAction {
    pub action: Action,
    pub board: Board,
    pub kind: InvalidActionKind,
}

// ============================================================================
// TURN / ACTIONS / TRANSITION
// ============================================================================

/// Starting position: all cells empty, X to move
pub fn initial_state() -> Board {
    Board::empty()
}

/// Player to move. O moves whenever X has placed more marks.
pub fn player(board: &Board) -> Player {
    if board.count(Cell::X) > board.count(Cell::O) {
        Player::O
    } else {
        Player::X
    }
}

/// All legal actions (empty cells)
pub fn actions(board: &Board) -> FxHashSet<Action> {
    legal_actions(board).into_iter().collect()
}

/// Legal actions in row-major order
pub fn legal_actions(board: &Board) -> Vec<Action> {
    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, &cell)| cell == Cell::Empty)
        .map(|(i, _)| Action::from_index(i))
        .collect()
}

/// Board after the player to move marks `action`
pub fn result(board: &Board, action: Action) -> Result<Board, InvalidAction> {
    let kind = if !action.is_valid() {
        Some(InvalidActionKind::OutOfRange)
    } else if board.cells()[action.index()] != Cell::Empty {
        Some(InvalidActionKind::Occupied)
    } else {
        None
    };

    match kind {
        Some(kind) => Err(InvalidAction {
            action,
            board: *board,
            kind,
        }),
        None => Ok(place(board, action)),
    }
}

/// Transition for an action already known to be legal
pub(crate) fn place(board: &Board, action: Action) -> Board {
    board.with_cell(action, player(board).mark())
}

// ============================================================================
// OUTCOME EVALUATION
// ============================================================================

/// Owner of the first completed line in scan order.
///
/// Boards with several completed lines (unreachable in legal play) report
/// whichever line comes first: rows, then columns, then diagonals.
pub fn winner(board: &Board) -> Option<Player> {
    let cells = board.cells();
    WINNING_LINES.iter().find_map(|&[a, b, c]| {
        let mark = cells[a];
        if mark != Cell::Empty && mark == cells[b] && mark == cells[c] {
            mark.player()
        } else {
            None
        }
    })
}

/// True once a line is complete or no empty cell remains
pub fn terminal(board: &Board) -> bool {
    winner(board).is_some() || board.is_full()
}

/// Payoff from X's point of view: 1, -1 or 0.
///
/// Non-terminal boards score 0.
pub fn utility(board: &Board) -> i8 {
    match winner(board) {
        Some(Player::X) => 1,
        Some(Player::O) => -1,
        None => 0,
    }
}

pub fn outcome(board: &Board) -> Outcome {
    match winner(board) {
        Some(Player::X) => Outcome::WinX,
        Some(Player::O) => Outcome::WinO,
        None if board.is_full() => Outcome::Draw,
        None => Outcome::InProgress,
    }
}

/// Number of plies played so far
pub fn ply(board: &Board) -> usize {
    CELL_COUNT - board.count(Cell::Empty)
}

// ============================================================================
// TESTS
// ============================================================================
