//! Exhaustive adversarial search for tic-tac-toe.
//!
//! The engine plays the full game tree (at most nine plies) with minimax,
//! optionally cut down by alpha-beta pruning. Scores are depth-adjusted:
//! a win `d` plies deep scores `10 - d` and a loss scores `d - 10`, so the
//! engine takes the fastest win and delays a forced loss as long as possible.
//!
//! Hypothetical placements are made in place on the caller's board through a
//! [`Trial`] guard that clears the square again when dropped, so the board is
//! restored on every exit path, early pruning cutoffs included.

use super::action::Move;
use super::rules::{available_moves, check_winner, is_full};
use super::types::{Board, Player, Square};
use std::ops::{Deref, DerefMut};
use tracing::{debug, instrument};

/// Score of a win at depth zero.
pub const WIN_SCORE: i32 = 10;

/// Whether the search cuts branches that cannot affect the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum Pruning {
    /// Alpha-beta pruning.
    #[default]
    AlphaBeta,
    /// Plain minimax over the whole tree.
    Disabled,
}

/// Outcome of a top-level search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Score of the chosen move from the searching player's perspective.
    pub score: i32,
    /// The chosen move, or `None` when no square is empty.
    pub best_move: Option<Move>,
    /// Number of positions visited.
    pub nodes: u64,
}

/// Minimax search playing for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEngine {
    player: Player,
    opponent: Player,
    pruning: Pruning,
}

impl SearchEngine {
    /// Creates an alpha-beta engine playing as `player`.
    pub fn new(player: Player) -> Self {
        Self::with_pruning(player, Pruning::AlphaBeta)
    }

    /// Creates an engine that searches the whole tree without pruning.
    pub fn without_pruning(player: Player) -> Self {
        Self::with_pruning(player, Pruning::Disabled)
    }

    /// Creates an engine with an explicit pruning policy.
    pub fn with_pruning(player: Player, pruning: Pruning) -> Self {
        Self {
            player,
            opponent: player.opponent(),
            pruning,
        }
    }

    /// The side this engine plays for.
    pub fn player(&self) -> Player {
        self.player
    }

    /// The pruning policy in use.
    pub fn pruning(&self) -> Pruning {
        self.pruning
    }

    /// Returns the optimal move for this engine's player, or `None` if the
    /// board has no empty square.
    ///
    /// Searches a private copy; `board` is never touched.
    pub fn best_move(&self, board: &Board) -> Option<Move> {
        let mut scratch = *board;
        self.search(&mut scratch).best_move
    }

    /// Searches every empty square in row-major order and keeps the first
    /// one with the strictly greatest score.
    ///
    /// `board` is mutated during the search and restored before returning.
    #[instrument(skip(self, board), fields(player = %self.player, pruning = %self.pruning))]
    pub fn search(&self, board: &mut Board) -> SearchResult {
        let mut nodes = 0;
        let mut best_score = i32::MIN;
        let mut best_move = None;

        for mv in available_moves(board) {
            let score = {
                let mut trial = Trial::place(board, mv, self.player);
                self.minimax(&mut trial, 0, false, i32::MIN, i32::MAX, &mut nodes)
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
        }

        let score = match best_move {
            Some(_) => best_score,
            None => self.terminal_score(board, 0).unwrap_or(0),
        };

        debug!(?best_move, score, nodes, "Search complete");
        SearchResult {
            score,
            best_move,
            nodes,
        }
    }

    /// Scores a position from this engine's perspective at depth zero.
    ///
    /// `self_to_move` says whose turn it is in the position.
    pub fn evaluate(&self, board: &mut Board, self_to_move: bool) -> i32 {
        let mut nodes = 0;
        self.minimax(board, 0, self_to_move, i32::MIN, i32::MAX, &mut nodes)
    }

    /// Score of a finished position, `None` if play continues.
    fn terminal_score(&self, board: &Board, depth: i32) -> Option<i32> {
        match check_winner(board) {
            Some(winner) if winner == self.player => Some(WIN_SCORE - depth),
            Some(_) => Some(depth - WIN_SCORE),
            None if is_full(board) => Some(0),
            None => None,
        }
    }

    fn minimax(
        &self,
        board: &mut Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        nodes: &mut u64,
    ) -> i32 {
        *nodes += 1;

        if let Some(score) = self.terminal_score(board, depth) {
            return score;
        }

        let mover = if maximizing { self.player } else { self.opponent };
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in available_moves(board) {
            let score = {
                let mut trial = Trial::place(board, mv, mover);
                self.minimax(&mut trial, depth + 1, !maximizing, alpha, beta, nodes)
            };

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }

            if self.pruning == Pruning::AlphaBeta && beta <= alpha {
                break;
            }
        }

        best
    }
}

/// A hypothetical placement that is undone when the guard is dropped.
struct Trial<'a> {
    board: &'a mut Board,
    mv: Move,
    previous: Square,
}

impl<'a> Trial<'a> {
    /// Places `player` at `mv`, which must be an in-bounds square.
    fn place(board: &'a mut Board, mv: Move, player: Player) -> Self {
        let previous = board.put(mv, Square::Occupied(player));
        Self {
            board,
            mv,
            previous,
        }
    }
}

impl Deref for Trial<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.board.put(self.mv, self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_restores_square_on_drop() {
        let mut board = Board::new();
        {
            let trial = Trial::place(&mut board, Move::new(1, 1), Player::X);
            assert_eq!(trial.get(Move::new(1, 1)), Some(Square::Occupied(Player::X)));
        }
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_nested_trials_unwind_in_order() {
        let mut board = Board::new();
        {
            let mut outer = Trial::place(&mut board, Move::new(0, 0), Player::X);
            {
                let inner = Trial::place(&mut outer, Move::new(0, 1), Player::O);
                assert_eq!(inner.count(Player::X) + inner.count(Player::O), 2);
            }
            assert_eq!(outer.get(Move::new(0, 1)), Some(Square::Empty));
        }
        assert_eq!(board, Board::new());
    }
}
