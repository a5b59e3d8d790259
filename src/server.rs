//! REST API for tic-tac-toe sessions.

use crate::games::tictactoe::{Board, GameStatus, Move, Player};
use crate::orchestrator::MoveOrchestrator;
use crate::session::{GameMode, GameSession, SessionManager, TurnError};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Session registry.
    pub sessions: SessionManager,
    /// Opponent move selection.
    pub orchestrator: Arc<MoveOrchestrator>,
}

impl AppState {
    /// Creates handler state.
    pub fn new(sessions: SessionManager, orchestrator: MoveOrchestrator) -> Self {
        Self {
            sessions,
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Request for creating a game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewGameRequest {
    /// Opponent mode; algorithmic when omitted.
    #[serde(default)]
    pub mode: GameMode,
}

/// Request for making a move.
///
/// Coordinates are signed so that out-of-range values reach validation
/// instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row index (0-2).
    pub row: i64,
    /// Column index (0-2).
    pub col: i64,
}

impl MoveRequest {
    /// Converts to a move, rejecting coordinates outside 0-2.
    pub fn to_move(&self) -> Result<Move, ApiError> {
        let coordinate = |value: i64, name: &str| {
            usize::try_from(value)
                .ok()
                .filter(|v| *v < Board::SIZE)
                .ok_or_else(|| {
                    ApiError::Validation(format!("{} must be between 0 and 2, got {}", name, value))
                })
        };
        Ok(Move::new(coordinate(self.row, "row")?, coordinate(self.col, "col")?))
    }
}

/// Public view of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    /// Board as rows of "", "X", "O".
    pub board: Board,
    /// Player to move (the last mover once the game is over).
    pub current_turn: Player,
    /// Winner, if any.
    pub winner: Option<Player>,
    /// Whether the game ended in a draw.
    pub is_draw: bool,
    /// Whether the game is over.
    pub game_over: bool,
    /// Opponent mode.
    pub mode: GameMode,
}

impl From<&GameSession> for GameStateView {
    fn from(session: &GameSession) -> Self {
        let game = &session.game;
        Self {
            board: *game.board(),
            current_turn: game.current_turn(),
            winner: game.winner(),
            is_draw: game.is_draw(),
            game_over: game.is_over(),
            mode: session.mode,
        }
    }
}

/// Response for game operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    /// Session identifier.
    pub session_id: String,
    /// Current game state.
    pub state: GameStateView,
    /// Additional information.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GameResponse {
    fn new(session: &GameSession, message: Option<String>) -> Self {
        Self {
            session_id: session.id.clone(),
            state: GameStateView::from(session),
            message,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy".
    pub status: &'static str,
    /// Human-readable status.
    pub message: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// Deletion confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: String,
}

/// API error mapped to an HTTP status and a `{"detail": ...}` body.
#[derive(Debug, Clone, Display)]
pub enum ApiError {
    /// Unknown session.
    #[display("{}", _0)]
    NotFound(String),
    /// Move rejected by the game rules.
    #[display("{}", _0)]
    BadRequest(String),
    /// Request failed validation before reaching game logic.
    #[display("{}", _0)]
    Validation(String),
    /// Unexpected internal fault.
    #[display("{}", _0)]
    Internal(String),
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::SessionNotFound(_) => ApiError::NotFound("Session not found".to_string()),
            TurnError::InvalidMove(e) => ApiError::BadRequest(e.to_string()),
            TurnError::Internal(message) => ApiError::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), reason = %rejection.body_text(), "Rejected request body");
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(message) = &self {
            error!(%message, "Internal error");
        }
        let body = serde_json::json!({ "detail": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Creates the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/game/new", post(create_game))
        .route("/api/game/{session_id}/state", get(get_game_state))
        .route("/api/game/{session_id}/move", post(make_move))
        .route("/api/game/{session_id}", delete(delete_game))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Starts the HTTP server.
pub async fn run_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        host = %config.host,
        port = config.port,
        "Tic-tac-toe server listening on http://{}:{}",
        config.host,
        config.port
    );

    axum::serve(listener, router).await?;
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Tic Tac Toe API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<NewGameRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(request) = payload?;
    if request.mode == GameMode::Oracle && !state.orchestrator.has_oracle() {
        warn!("Oracle mode requested without a configured oracle; moves will come from search");
    }

    let id = state.sessions.create_session(request.mode);
    let session = state
        .sessions
        .get_session(&id)
        .await
        .ok_or_else(|| ApiError::Internal("Session not found after creation".to_string()))?;

    Ok(Json(GameResponse::new(
        &session,
        Some(format!("New game created with {} mode", request.mode)),
    )))
}

#[instrument(skip(state))]
async fn get_game_state(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let session = state
        .sessions
        .get_session(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    Ok(Json(GameResponse::new(&session, None)))
}

#[instrument(skip(state))]
async fn make_move(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(request) = payload?;
    let mv = request.to_move()?;

    let session = state
        .sessions
        .play_turn(&session_id, mv, &state.orchestrator)
        .await?;

    let message = match session.game.status() {
        GameStatus::InProgress => None,
        GameStatus::Won(player) => Some(format!("Player {} wins!", player)),
        GameStatus::Draw => Some("Game ended in a draw!".to_string()),
    };

    Ok(Json(GameResponse::new(&session, message)))
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if state.sessions.delete_session(&session_id) {
        Ok(Json(MessageResponse {
            message: "Game session deleted successfully".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("Session not found".to_string()))
    }
}
