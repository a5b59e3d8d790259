//! Tic-tac-toe server - CLI entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tictactoe_server::{
    AppState, Game, GameStatus, MoveOrchestrator, OracleConfig, Player, Pruning, SearchEngine,
    ServerConfig, SessionManager, run_server,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Http {
            port,
            host,
            oracle_config,
        } => run_http_server(host, port, oracle_config).await,
        Command::SelfPlay { no_pruning } => {
            let pruning = if no_pruning {
                Pruning::Disabled
            } else {
                Pruning::AlphaBeta
            };
            run_self_play(pruning)
        }
    }
}

/// Run the HTTP game server
#[instrument]
async fn run_http_server(host: String, port: u16, oracle_config: Option<PathBuf>) -> Result<()> {
    let config = match &oracle_config {
        Some(path) => OracleConfig::from_file(path)
            .with_context(|| format!("loading oracle config {}", path.display()))?,
        None => OracleConfig::default(),
    }
    .with_env_overrides();

    let orchestrator = MoveOrchestrator::from_config(&config).context("building move oracle")?;
    info!(oracle = orchestrator.has_oracle(), "Opponent configured");

    let state = AppState::new(SessionManager::new(), orchestrator);
    run_server(ServerConfig { host, port }, state).await
}

/// Play the engine against itself
#[instrument]
fn run_self_play(pruning: Pruning) -> Result<()> {
    let mut game = Game::new();
    let engines = [
        SearchEngine::with_pruning(Player::X, pruning),
        SearchEngine::with_pruning(Player::O, pruning),
    ];

    while !game.is_over() {
        let player = game.current_turn();
        let engine = engines
            .iter()
            .find(|engine| engine.player() == player)
            .context("no engine for player")?;
        let mv = engine
            .best_move(game.board())
            .context("unfinished game has no empty square")?;

        game.make_move(mv, player)?;
        println!("{} plays {}\n{}\n", player, mv, game.board().display());
    }

    match game.status() {
        GameStatus::Won(player) => println!("Player {} wins", player),
        GameStatus::Draw => println!("Draw"),
        GameStatus::InProgress => unreachable!("loop exits only when the game is over"),
    }
    Ok(())
}
