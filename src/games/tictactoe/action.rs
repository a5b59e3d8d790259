//! First-class action types for tic-tac-toe.
//!
//! Moves are plain coordinates; whether a move is legal is decided
//! against a board by the rules and the game, not by construction.

use super::Player;
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a `(row, col)` pair, each in `0..=2` when legal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_new::new,
    derive_more::Display,
)]
#[display("({row}, {col})")]
pub struct Move {
    /// Row index, top to bottom.
    pub row: usize,
    /// Column index, left to right.
    pub col: usize,
}

impl Move {
    /// Returns true if both coordinates are on the board.
    pub fn in_bounds(&self) -> bool {
        self.row < 3 && self.col < 3
    }
}

impl From<(usize, usize)> for Move {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// One of the coordinates is outside the board.
    #[display("Move {} is out of bounds (row and col must be 0-2)", _0)]
    OutOfBounds(Move),

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Move),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),

    /// A board symbol other than "", "X" or "O".
    #[display("Invalid square symbol {:?}", _0)]
    InvalidSymbol(String),
}

impl std::error::Error for MoveError {}
