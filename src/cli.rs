//! Command-line interface for tictactoe_server.

use clap::{Parser, Subcommand};

/// Tic-tac-toe server with a search engine and an optional LLM oracle
#[derive(Parser, Debug)]
#[command(name = "tictactoe_server")]
#[command(about = "Tic-tac-toe game server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Path to an oracle TOML config. Defaults apply when omitted.
        #[arg(long)]
        oracle_config: Option<std::path::PathBuf>,
    },

    /// Play the search engine against itself and print the game
    SelfPlay {
        /// Search without alpha-beta pruning
        #[arg(long)]
        no_pruning: bool,
    },
}
