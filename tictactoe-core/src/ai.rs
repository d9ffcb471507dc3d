//! Minimax AI with alpha-beta pruning
//!
//! Exhaustive search to terminal positions. X maximizes utility, O minimizes
//! it. Legal actions are shuffled at every node, so among equally good moves
//! the one returned depends on the RNG; the value reached never does.

use crate::board::{Action, Board, Player};
use crate::game::{legal_actions, place, player, terminal, utility};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Starting value for the maximizer, below any utility
const MAX_FLOOR: i8 = -10;

/// Starting value for the minimizer, above any utility
const MIN_CEILING: i8 = 10;

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Outcome of one top-level search
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Chosen action, `None` on terminal boards
    pub action: Option<Action>,
    /// Game-theoretic value of the position (X's point of view)
    pub value: i8,
    /// Child positions expanded during this search
    pub nodes_expanded: u64,
}

/// Perfect-play minimax player
pub struct MinimaxAI {
    rng: ChaCha8Rng,
}

impl MinimaxAI {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible tie-breaking
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Get best move for current position
    pub fn best_move(&mut self, board: &Board) -> Option<Action> {
        self.search(board).action
    }

    /// Search the position and report value and node count.
    ///
    /// The node counter starts from zero on every call.
    pub fn search(&mut self, board: &Board) -> SearchResult {
        if terminal(board) {
            return SearchResult {
                action: None,
                value: utility(board),
                nodes_expanded: 0,
            };
        }

        let to_move = player(board);
        tracing::debug!("Exploring possible actions for {} on {}", to_move, board);

        let mut ctx = SearchContext {
            rng: &mut self.rng,
            nodes_expanded: 0,
        };
        let (value, action) = match to_move {
            Player::X => maximize(&mut ctx, board, MIN_CEILING),
            Player::O => minimize(&mut ctx, board, MAX_FLOOR),
        };

        tracing::debug!(
            "Search done: action={:?}, value={}, nodes expanded={}",
            action,
            value,
            ctx.nodes_expanded
        );

        SearchResult {
            action,
            value,
            nodes_expanded: ctx.nodes_expanded,
        }
    }

    /// Play both sides until the game ends
    pub fn play_game(&mut self, initial: Board) -> (Board, Vec<Action>) {
        let mut board = initial;
        let mut history = Vec::new();

        while let Some(action) = self.best_move(&board) {
            history.push(action);
            board = place(&board, action);
        }

        (board, history)
    }
}

impl Default for MinimaxAI {
    fn default() -> Self {
        Self::new()
    }
}

/// Optimal action for the player to move, `None` if the game is over
pub fn minimax(board: &Board) -> Option<Action> {
    MinimaxAI::new().best_move(board)
}

// ============================================================================
// ALPHA-BETA SEARCH
// ============================================================================

/// Per-search mutable state, threaded through the recursion
struct SearchContext<'a> {
    rng: &'a mut ChaCha8Rng,
    nodes_expanded: u64,
}

impl SearchContext<'_> {
    fn shuffled_actions(&mut self, board: &Board) -> Vec<Action> {
        let mut actions = legal_actions(board);
        actions.shuffle(&mut *self.rng);
        actions
    }
}

/// X to move. `bound` is the best value the minimizing parent already has;
/// once this node reaches it, the parent will not pick this branch.
fn maximize(ctx: &mut SearchContext<'_>, board: &Board, bound: i8) -> (i8, Option<Action>) {
    if terminal(board) {
        return (utility(board), None);
    }

    let mut best_value = MAX_FLOOR;
    let mut best_action = None;

    for action in ctx.shuffled_actions(board) {
        if bound <= best_value {
            break;
        }

        ctx.nodes_expanded += 1;
        let child = place(board, action);
        let (child_value, _) = minimize(ctx, &child, best_value);
        if child_value > best_value {
            best_value = child_value;
            best_action = Some(action);
        }
    }

    (best_value, best_action)
}

/// O to move. Mirror of `maximize`.
fn minimize(ctx: &mut SearchContext<'_>, board: &Board, bound: i8) -> (i8, Option<Action>) {
    if terminal(board) {
        return (utility(board), None);
    }

    let mut best_value = MIN_CEILING;
    let mut best_action = None;

    for action in ctx.shuffled_actions(board) {
        if bound >= best_value {
            break;
        }

        ctx.nodes_expanded += 1;
        let child = place(board, action);
        let (child_value, _) = maximize(ctx, &child, best_value);
        if child_value < best_value {
            best_value = child_value;
            best_action = Some(action);
        }
    }

    (best_value, best_action)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{initial_state, outcome, result, winner, Outcome};

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    /// Plain minimax without pruning
    fn exact_value(board: &Board) -> i8 {
        if terminal(board) {
            return utility(board);
        }
        let values = legal_actions(board)
            .into_iter()
            .map(|a| exact_value(&place(board, a)));
        match player(board) {
            Player::X => values.max().unwrap(),
            Player::O => values.min().unwrap(),
        }
    }

    #[test]
    fn test_terminal_board_returns_none() {
        let full = board("XOX/XOO/OXX");
        assert_eq!(minimax(&full), None);

        let won = board("XXX/OO./...");
        let mut ai = MinimaxAI::with_seed(1);
        let res = ai.search(&won);
        assert_eq!(res.action, None);
        assert_eq!(res.value, 1);
        assert_eq!(res.nodes_expanded, 0);
    }

    #[test]
    fn test_blocks_open_row() {
        // X threatens (0, 2); every other reply loses
        let b = board("XX./.O./...");
        assert_eq!(player(&b), Player::O);
        for seed in 0..8 {
            let res = MinimaxAI::with_seed(seed).search(&b);
            assert_eq!(res.action, Some(Action::new(0, 2)));
            assert_eq!(res.value, 0);
        }
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board("XX./OO./...");
        assert_eq!(player(&b), Player::X);
        for seed in 0..8 {
            let mut ai = MinimaxAI::with_seed(seed);
            let res = ai.search(&b);
            assert_eq!(res.action, Some(Action::new(0, 2)));
            assert_eq!(res.value, 1);
            let after = result(&b, Action::new(0, 2)).unwrap();
            assert_eq!(winner(&after), Some(Player::X));
        }
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let mut ai = MinimaxAI::with_seed(3);
        let res = ai.search(&initial_state());
        assert_eq!(res.value, 0);
        assert!(res.action.is_some());
        // Full tree has 549,945 non-root nodes; pruning must cut that down
        assert!(res.nodes_expanded > 0);
        assert!(res.nodes_expanded < 549_945);
    }

    #[test]
    fn test_search_value_matches_plain_minimax() {
        for s in ["X../.../...", "X../.O./...", "XO./.../...", "X.O/.X./...", "XOX/.O./..."] {
            let b = board(s);
            let res = MinimaxAI::with_seed(11).search(&b);
            assert_eq!(res.value, exact_value(&b), "board {}", s);
            let child = place(&b, res.action.unwrap());
            assert_eq!(exact_value(&child), res.value, "board {}", s);
        }
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let b = board("X../.../...");
        let first = MinimaxAI::with_seed(42).search(&b);
        let second = MinimaxAI::with_seed(42).search(&b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_node_counter_resets_each_search() {
        let b = board("XOX/XOO/OX.");
        let mut ai = MinimaxAI::with_seed(5);
        for _ in 0..3 {
            let res = ai.search(&b);
            assert_eq!(res.action, Some(Action::new(2, 2)));
            assert_eq!(res.nodes_expanded, 1);
        }
    }

    #[test]
    fn test_play_game_draws() {
        let mut ai = MinimaxAI::with_seed(9);
        let (final_board, history) = ai.play_game(initial_state());
        assert_eq!(outcome(&final_board), Outcome::Draw);
        assert_eq!(history.len(), 9);
    }
}
