//! Move enumeration for tic-tac-toe.

use super::super::{Board, Move, Square};

/// Returns every empty square in row-major order.
///
/// Recomputed on each call; callers rely on the order for deterministic
/// move enumeration.
pub fn available_moves(board: &Board) -> Vec<Move> {
    board
        .rows()
        .iter()
        .enumerate()
        .flat_map(|(row, squares)| {
            squares
                .iter()
                .enumerate()
                .filter(|(_, square)| **square == Square::Empty)
                .map(move |(col, _)| Move::new(row, col))
        })
        .collect()
}
