//! Core domain types for tic-tac-toe.

use super::action::{Move, MoveError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the board symbol for this player.
    pub fn symbol(self) -> &'static str {
        match self {
            Player::X => "X",
            Player::O => "O",
        }
    }
}

/// A square on the tic-tac-toe board.
///
/// Serialized as `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the wire symbol for this square.
    pub fn symbol(self) -> &'static str {
        match self {
            Square::Empty => "",
            Square::Occupied(player) => player.symbol(),
        }
    }

    /// Parses a wire symbol. Only `""`, `"X"` and `"O"` are accepted.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "" => Some(Square::Empty),
            "X" => Some(Square::Occupied(Player::X)),
            "O" => Some(Square::Occupied(Player::O)),
            _ => None,
        }
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        Square::from_symbol(&symbol)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid square symbol {:?}", symbol)))
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    /// Squares in row-major order.
    squares: [[Square; 3]; 3],
}

impl Board {
    /// Side length of the board.
    pub const SIZE: usize = 3;

    /// Creates a new empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from row symbols (`""`, `"X"`, `"O"`).
    pub fn from_rows(rows: [[&str; 3]; 3]) -> Result<Self, MoveError> {
        let mut board = Self::new();
        for (row, symbols) in rows.iter().enumerate() {
            for (col, symbol) in symbols.iter().enumerate() {
                board.squares[row][col] = Square::from_symbol(symbol)
                    .ok_or_else(|| MoveError::InvalidSymbol(symbol.to_string()))?;
            }
        }
        Ok(board)
    }

    /// Gets the square at the given move coordinates, if in bounds.
    pub fn get(&self, mv: Move) -> Option<Square> {
        self.squares.get(mv.row)?.get(mv.col).copied()
    }

    /// Sets the square at the given move coordinates.
    pub fn set(&mut self, mv: Move, square: Square) -> Result<(), MoveError> {
        let cell = self
            .squares
            .get_mut(mv.row)
            .and_then(|row| row.get_mut(mv.col))
            .ok_or(MoveError::OutOfBounds(mv))?;
        *cell = square;
        Ok(())
    }

    /// Overwrites an in-bounds square and returns its previous value.
    pub(crate) fn put(&mut self, mv: Move, square: Square) -> Square {
        std::mem::replace(&mut self.squares[mv.row][mv.col], square)
    }

    /// Checks if a square is empty. Out-of-bounds coordinates are never empty.
    pub fn is_empty(&self, mv: Move) -> bool {
        matches!(self.get(mv), Some(Square::Empty))
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[[Square; 3]; 3] {
        &self.squares
    }

    /// Iterates over all squares in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares.iter().flatten().copied()
    }

    /// Counts the marks placed by a player.
    pub fn count(&self, player: Player) -> usize {
        self.squares()
            .filter(|square| *square == Square::Occupied(player))
            .count()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (row, squares) in self.squares.iter().enumerate() {
            for (col, square) in squares.iter().enumerate() {
                let symbol = match square {
                    Square::Empty => ".",
                    Square::Occupied(player) => player.symbol(),
                };
                result.push_str(symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}
