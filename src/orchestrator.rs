//! Opponent move selection: remote oracle first, search as the fallback.

use crate::games::tictactoe::{Board, Move, Player, SearchEngine};
use crate::llm_client::{LlmClient, LlmError};
use crate::oracle::{LlmSuggester, MoveSuggester, OracleError};
use crate::oracle_config::OracleConfig;
use crate::session::GameMode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Chooses opponent moves.
///
/// In oracle mode the configured [`MoveSuggester`] is asked once per turn,
/// bounded by a timeout. Anything other than an in-bounds move on an empty
/// square is discarded and the move comes from [`SearchEngine`] instead, so a
/// move is produced whenever the board has an empty square.
#[derive(Clone)]
pub struct MoveOrchestrator {
    oracle: Option<Arc<dyn MoveSuggester>>,
    timeout: Duration,
}

impl MoveOrchestrator {
    /// Default bound on one oracle call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Creates an orchestrator that only ever searches.
    pub fn search_only() -> Self {
        Self {
            oracle: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Creates an orchestrator that consults `oracle` in oracle mode.
    pub fn with_oracle(oracle: Arc<dyn MoveSuggester>, timeout: Duration) -> Self {
        Self {
            oracle: Some(oracle),
            timeout,
        }
    }

    /// Builds an orchestrator from oracle configuration.
    ///
    /// A missing API key is not an error: the orchestrator then searches only.
    #[instrument(skip(config), fields(provider = %config.provider()))]
    pub fn from_config(config: &OracleConfig) -> Result<Self, LlmError> {
        let llm_config = match config.create_llm_config() {
            Ok(llm_config) => llm_config,
            Err(e) => {
                warn!(reason = %e.message, "No oracle credential, opponent moves will come from search");
                return Ok(Self::search_only());
            }
        };

        let client = LlmClient::new(llm_config)?;
        info!(model = %config.model(), timeout = ?config.timeout(), "Oracle configured");
        Ok(Self::with_oracle(
            Arc::new(LlmSuggester::new(client)),
            config.timeout(),
        ))
    }

    /// Returns true if an oracle is configured.
    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Picks a move for `player`, or `None` if the board has no empty square.
    #[instrument(skip(self, board), fields(player = %player, mode = %mode))]
    pub async fn choose_move(&self, board: &Board, player: Player, mode: GameMode) -> Option<Move> {
        let oracle = match (mode, &self.oracle) {
            (GameMode::Oracle, Some(oracle)) => oracle,
            (GameMode::Oracle, None) => {
                debug!("No oracle configured, using search");
                return self.search(board, player);
            }
            (GameMode::Algorithmic, _) => return self.search(board, player),
        };

        match self.ask_oracle(oracle.as_ref(), board, player).await {
            Ok(mv) => {
                info!(oracle = oracle.name(), %mv, "Using oracle move");
                Some(mv)
            }
            Err(e) => {
                warn!(oracle = oracle.name(), reason = %e.message, "Oracle unavailable, using search");
                self.search(board, player)
            }
        }
    }

    /// One bounded oracle call, validated against the board.
    async fn ask_oracle(
        &self,
        oracle: &dyn MoveSuggester,
        board: &Board,
        player: Player,
    ) -> Result<Move, OracleError> {
        let mv = tokio::time::timeout(self.timeout, oracle.suggest(board, player))
            .await
            .map_err(|_| OracleError::new(format!("Timed out after {:?}", self.timeout)))??;

        if !mv.in_bounds() {
            return Err(OracleError::new(format!("Suggested move {} is out of bounds", mv)));
        }

        if !board.is_empty(mv) {
            return Err(OracleError::new(format!("Suggested square {} is occupied", mv)));
        }

        Ok(mv)
    }

    fn search(&self, board: &Board, player: Player) -> Option<Move> {
        SearchEngine::new(player).best_move(board)
    }
}

impl Default for MoveOrchestrator {
    fn default() -> Self {
        Self::search_only()
    }
}

impl std::fmt::Debug for MoveOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveOrchestrator")
            .field("oracle", &self.oracle.as_ref().map(|o| o.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
