//! Game session management.

use crate::games::tictactoe::{Game, Mark, Move, MoveError, Player};
use crate::orchestrator::MoveOrchestrator;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Shared, individually locked session.
///
/// Holding the lock is what serializes turns within one session.
pub type SessionHandle = Arc<tokio::sync::Mutex<GameSession>>;

/// The mark played by the human.
pub const HUMAN: Mark = Player::X;

/// The mark played by the server.
pub const COMPUTER: Mark = Player::O;

/// How the server picks its moves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Exhaustive search only.
    #[default]
    Algorithmic,
    /// Ask the LLM oracle first, search when it fails.
    #[serde(alias = "grok_ai")]
    Oracle,
}

/// A game session: one board and the mode chosen when it was created.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    /// Opponent mode.
    pub mode: GameMode,
    /// The game state.
    pub game: Game,
}

impl GameSession {
    /// Creates a new game session with an empty board.
    #[instrument]
    pub fn new(id: SessionId, mode: GameMode) -> Self {
        info!(session_id = %id, %mode, "Creating new game session");
        Self {
            id,
            mode,
            game: Game::new(),
        }
    }
}

/// Errors from playing a turn.
#[derive(Debug, Clone, Display, From)]
pub enum TurnError {
    /// No session with this ID (or it was deleted mid-turn).
    #[display("Session {} not found", _0)]
    SessionNotFound(SessionId),

    /// The human's move was rejected.
    #[display("Invalid move: {}", _0)]
    #[from]
    InvalidMove(MoveError),

    /// Something that should not happen in a legal game.
    #[display("Internal error: {}", _0)]
    Internal(String),
}

impl std::error::Error for TurnError {}

/// Manages all game sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a new game session with a fresh ID and an empty board.
    #[instrument(skip(self))]
    pub fn create_session(&self, mode: GameMode) -> SessionId {
        let mut sessions = self.write();

        let id = loop {
            let candidate = new_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
            warn!(session_id = %candidate, "Session ID collision, regenerating");
        };

        let session = GameSession::new(id.clone(), mode);
        sessions.insert(id.clone(), Arc::new(tokio::sync::Mutex::new(session)));

        info!(session_id = %id, %mode, "Created new session");
        id
    }

    /// Gets the shared handle for a session.
    pub fn handle(&self, id: &str) -> Option<SessionHandle> {
        let handle = self.read().get(id).cloned();
        if handle.is_none() {
            debug!(session_id = id, "Session not found");
        }
        handle
    }

    /// Gets a snapshot of a session.
    ///
    /// Waits for any turn in progress on that session to finish.
    #[instrument(skip(self))]
    pub async fn get_session(&self, id: &str) -> Option<GameSession> {
        let handle = self.handle(id)?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Removes a session. Returns whether it existed.
    #[instrument(skip(self))]
    pub fn delete_session(&self, id: &str) -> bool {
        let existed = self.write().remove(id).is_some();
        if existed {
            info!(session_id = id, "Deleted session");
        } else {
            debug!(session_id = id, "Delete of unknown session");
        }
        existed
    }

    /// Returns true if the session exists.
    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Lists all active session IDs.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let ids: Vec<_> = self.read().keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Plays one full turn: the human's move, then the server's reply.
    ///
    /// The session stays locked for the whole turn. If the session is deleted
    /// while the reply is being chosen, the reply is dropped and the turn
    /// reports [`TurnError::SessionNotFound`].
    #[instrument(skip(self, orchestrator), fields(row = mv.row, col = mv.col))]
    pub async fn play_turn(
        &self,
        id: &str,
        mv: Move,
        orchestrator: &MoveOrchestrator,
    ) -> Result<GameSession, TurnError> {
        let handle = self
            .handle(id)
            .ok_or_else(|| TurnError::SessionNotFound(id.to_string()))?;
        let mut session = handle.lock().await;

        session.game.make_move(mv, HUMAN).map_err(|e| {
            warn!(session_id = id, error = %e, "Rejected move");
            e
        })?;
        info!(session_id = id, status = ?session.game.status(), "Human move applied");

        if session.game.is_over() {
            return Ok(session.clone());
        }

        let board = *session.game.board();
        let reply = orchestrator.choose_move(&board, COMPUTER, session.mode).await;

        if !self.is_registered(id, &handle) {
            warn!(session_id = id, "Session deleted during turn, discarding reply");
            return Err(TurnError::SessionNotFound(id.to_string()));
        }

        let reply = reply.ok_or_else(|| {
            TurnError::Internal("No move available in an unfinished game".to_string())
        })?;
        session
            .game
            .make_move(reply, COMPUTER)
            .map_err(|e| TurnError::Internal(format!("Opponent move {} rejected: {}", reply, e)))?;

        info!(
            session_id = id,
            row = reply.row,
            col = reply.col,
            status = ?session.game.status(),
            "Opponent move applied"
        );
        Ok(session.clone())
    }

    /// True if `id` still maps to this exact session.
    fn is_registered(&self, id: &str, handle: &SessionHandle) -> bool {
        self.read()
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, handle))
    }
}

/// Random version-4 UUID in canonical hyphenated form.
fn new_session_id() -> SessionId {
    uuid::Uuid::new_v4().to_string()
}
