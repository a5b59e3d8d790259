//! Tic-tac-toe game server.
//!
//! Tracks per-session boards, validates human moves and answers with an
//! opponent move chosen either by exhaustive search or by an LLM oracle that
//! falls back to search whenever its answer is unusable.
//!
//! # Architecture
//!
//! - **Games**: board, rules and the minimax search engine
//! - **Oracle**: remote move suggesters and the LLM client behind them
//! - **Orchestrator**: oracle-first, search-fallback move selection
//! - **Session**: per-session game state with serialized turns
//! - **Server**: REST API over axum
//!
//! # Example
//!
//! ```
//! use tictactoe_server::{Board, Move, Player, SearchEngine};
//!
//! let board = Board::from_rows([["O", "O", ""], ["X", "X", ""], ["", "", ""]]).unwrap();
//! let engine = SearchEngine::new(Player::O);
//! assert_eq!(engine.best_move(&board), Some(Move::new(0, 2)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod games;
mod llm_client;
mod oracle;
mod oracle_config;
mod orchestrator;
mod server;
mod session;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, Game, GameStatus, Mark, Move, MoveError, Player, Pruning, SearchEngine, SearchResult,
    Square, WIN_SCORE, available_moves, check_winner, is_draw, is_full,
};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Oracle
pub use oracle::{
    LlmSuggester, MoveSuggester, OracleError, board_prompt, parse_move_reply, system_prompt,
};
pub use oracle_config::{API_BASE_VAR, ConfigError, GROQ_API_BASE_VAR, OracleConfig};

// Crate-level exports - Move selection
pub use orchestrator::MoveOrchestrator;

// Crate-level exports - Session management
pub use session::{
    COMPUTER, GameMode, GameSession, HUMAN, SessionHandle, SessionId, SessionManager, TurnError,
};

// Crate-level exports - Server types
pub use server::{
    ApiError, AppState, GameResponse, GameStateView, MoveRequest, NewGameRequest, ServerConfig,
    create_router, run_server,
};
