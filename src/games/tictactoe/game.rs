//! Game state and move validation for tic-tac-toe.

use super::action::{Move, MoveError};
use super::rules::{available_moves, check_winner, is_full};
use super::types::{Board, GameStatus, Player, Square};
use tracing::{debug, instrument};

/// Tic-tac-toe game: a board plus whose turn it is and whether it is over.
///
/// The board only changes through [`Game::make_move`], one mark per turn,
/// and is frozen once the game is won or drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    current_turn: Player,
    status: GameStatus,
}

impl Game {
    /// Creates a new game. X moves first.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_turn: Player::X,
            status: GameStatus::InProgress,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player whose turn it is.
    ///
    /// Once the game is over this is the player who made the last move.
    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }

    /// Returns true if the game ended in a draw.
    pub fn is_draw(&self) -> bool {
        self.status == GameStatus::Draw
    }

    /// Returns true if no more moves are accepted.
    pub fn is_over(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Returns every empty square in row-major order.
    pub fn available_moves(&self) -> Vec<Move> {
        available_moves(&self.board)
    }

    /// Places `player`'s mark at `mv`.
    ///
    /// Rejected moves leave the game untouched.
    #[instrument(skip(self), fields(row = mv.row, col = mv.col, player = %player))]
    pub fn make_move(&mut self, mv: Move, player: Player) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }

        if !mv.in_bounds() {
            return Err(MoveError::OutOfBounds(mv));
        }

        if !self.board.is_empty(mv) {
            return Err(MoveError::SquareOccupied(mv));
        }

        if player != self.current_turn {
            return Err(MoveError::WrongPlayer(player));
        }

        self.board.set(mv, Square::Occupied(player))?;
        self.update_status();

        if !self.is_over() {
            self.current_turn = player.opponent();
        }

        debug!(status = ?self.status, "Move applied");
        Ok(())
    }

    /// Updates game status after a move.
    fn update_status(&mut self) {
        if let Some(winner) = check_winner(&self.board) {
            self.status = GameStatus::Won(winner);
        } else if is_full(&self.board) {
            self.status = GameStatus::Draw;
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
