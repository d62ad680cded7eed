//! Command-line interface for gamerzo.

use clap::{Parser, Subcommand};

/// Gamerzo - tic-tac-toe with match history
#[derive(Parser, Debug)]
#[command(name = "gamerzo")]
#[command(about = "Hot-seat tic-tac-toe with accounts and statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(long, global = true, default_value = "gamerzo.toml")]
    pub config: std::path::PathBuf,

    /// Override the database file from the config
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Register {
        /// Account name
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Password again, must match
        #[arg(long)]
        confirm_password: String,
    },

    /// Play a match in the terminal (you are X)
    Play {
        /// Account to sign in as
        #[arg(short, long)]
        user: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,

        /// Opponent label (defaults to the configured opponent)
        #[arg(short, long)]
        opponent: Option<String>,
    },

    /// Show counters for everyone and for one account
    Stats {
        /// Account to show wins/losses/draws for
        #[arg(short, long)]
        user: String,
    },

    /// Show recent matches for an account
    History {
        /// Account to show matches for
        #[arg(short, long)]
        user: String,

        /// Maximum rows (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
