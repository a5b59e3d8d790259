mod action;
mod game;
pub mod rules;
mod search;
mod types;

pub use action::{Move, MoveError};
pub use game::Game;
pub use rules::{available_moves, check_winner, is_draw, is_full};
pub use search::{Pruning, SearchEngine, SearchResult, WIN_SCORE};
pub use types::{Board, GameStatus, Player, Square};

/// Alias for clarity in session management.
pub type Mark = Player;
