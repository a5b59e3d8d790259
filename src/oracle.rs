//! Remote move oracles.
//!
//! A [`MoveSuggester`] proposes a move for a board or reports that it is
//! unavailable. The orchestrator never trusts a suggestion: it validates the
//! coordinates against the board and falls back to search on any failure.

use crate::games::tictactoe::{Board, Move, Player, Square};
use crate::llm_client::LlmClient;
use derive_more::{Display, Error};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Something that can propose a move for a board.
///
/// Implementations report every failure as [`OracleError`]; callers treat all
/// of them the same way.
#[async_trait::async_trait]
pub trait MoveSuggester: Send + Sync {
    /// Proposes a move for `player` on `board`.
    async fn suggest(&self, board: &Board, player: Player) -> Result<Move, OracleError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// The oracle could not produce a usable move.
#[derive(Debug, Clone, Display, Error)]
#[display("Oracle unavailable: {} at {}:{}", message, file, line)]
pub struct OracleError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl OracleError {
    /// Creates a new oracle error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Move oracle backed by a chat-completion LLM.
#[derive(Debug, Clone)]
pub struct LlmSuggester {
    client: LlmClient,
}

impl LlmSuggester {
    /// Wraps an LLM client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MoveSuggester for LlmSuggester {
    #[instrument(skip(self, board), fields(model = %self.client.config().model()))]
    async fn suggest(&self, board: &Board, player: Player) -> Result<Move, OracleError> {
        let reply = self
            .client
            .generate(&system_prompt(player), &board_prompt(board, player))
            .await
            .map_err(|e| OracleError::new(e.message))?;

        info!(reply = %reply, "Oracle replied");
        parse_move_reply(&reply)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// System prompt instructing the model to answer with a coordinate object.
pub fn system_prompt(player: Player) -> String {
    format!(
        "You are an expert Tic Tac Toe player. You play as '{}'. \
         Analyze the board and respond with ONLY a JSON object in this exact format: \
         {{\"row\": <number>, \"col\": <number>}}. \
         Row and col must be 0, 1, or 2. No additional text or explanation.",
        player.symbol()
    )
}

/// User prompt describing the board row by row.
pub fn board_prompt(board: &Board, player: Player) -> String {
    let mut rows = String::new();
    for (index, squares) in board.rows().iter().enumerate() {
        let cells: Vec<&str> = squares
            .iter()
            .map(|square| match square {
                Square::Empty => " ",
                Square::Occupied(p) => p.symbol(),
            })
            .collect();
        rows.push_str(&format!("Row {}: {}\n", index, cells.join(" | ")));
    }

    format!(
        "Current Tic Tac Toe board (you are '{player}'):\n\n\
         {rows}\n\
         Analyze the board and make the best move. Consider:\n\
         1. Can you win in this move?\n\
         2. Must you block opponent's winning move?\n\
         3. Strategic position (center, corners, edges)\n\n\
         Respond with JSON: {{\"row\": <0-2>, \"col\": <0-2>}}\n",
        player = player.symbol(),
        rows = rows,
    )
}

/// A coordinate as models actually write it: a number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(i64),
    Text(String),
}

impl Coordinate {
    fn to_index(&self) -> Result<usize, OracleError> {
        let value = match self {
            Coordinate::Number(n) => *n,
            Coordinate::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| OracleError::new(format!("Non-numeric coordinate {:?}", s)))?,
        };
        usize::try_from(value).map_err(|_| OracleError::new(format!("Negative coordinate {}", value)))
    }
}

#[derive(Debug, Deserialize)]
struct CoordinateReply {
    row: Coordinate,
    col: Coordinate,
}

/// Extracts a move from free-form model output.
///
/// Returns the first well-formed `{"row": .., "col": ..}` object found in the
/// text, ignoring anything around it. Coordinates are not range-checked here.
#[instrument(skip(reply))]
pub fn parse_move_reply(reply: &str) -> Result<Move, OracleError> {
    for (start, _) in reply.match_indices('{') {
        let mut objects = serde_json::Deserializer::from_str(&reply[start..])
            .into_iter::<CoordinateReply>();

        match objects.next() {
            Some(Ok(coords)) => {
                let mv = Move::new(coords.row.to_index()?, coords.col.to_index()?);
                debug!(%mv, "Parsed oracle reply");
                return Ok(mv);
            }
            Some(Err(e)) => debug!(start, error = %e, "No coordinate object at offset"),
            None => {}
        }
    }

    warn!(reply = %reply, "No coordinate object in oracle reply");
    Err(OracleError::new("No coordinate object in reply"))
}
