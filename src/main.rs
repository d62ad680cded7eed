//! Gamerzo - command-line front end
//!
//! Hot-seat tic-tac-toe with accounts, match history and statistics.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use gamerzo::{
    AppConfig, GameSession, HistoryRecorder, HistoryRepository, ProfileService, SqliteStore,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(db_path) = cli.db_path {
        config = config.with_db_path(db_path);
    }

    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = SqliteStore::open(config.db_path().clone())
        .with_context(|| format!("Failed to open database '{}'", config.db_path()))?;

    match cli.command {
        Command::Register {
            username,
            password,
            confirm_password,
        } => run_register(&store, &username, &password, &confirm_password),
        Command::Play {
            user,
            password,
            opponent,
        } => run_play(&config, &store, &user, &password, opponent),
        Command::Stats { user } => run_stats(&config, &store, &user),
        Command::History { user, limit } => run_history(&config, &store, &user, limit),
    }
}

/// Create an account
#[instrument(skip(store, password, confirmation))]
fn run_register(
    store: &SqliteStore,
    username: &str,
    password: &str,
    confirmation: &str,
) -> Result<()> {
    let profiles = ProfileService::new(store.clone());
    let user = profiles.register(username, password, confirmation)?;
    println!("Registered {} (id {})", user.username(), user.id());
    Ok(())
}

/// Play one session in the terminal
#[instrument(skip(config, store, password))]
fn run_play(
    config: &AppConfig,
    store: &SqliteStore,
    user: &str,
    password: &str,
    opponent: Option<String>,
) -> Result<()> {
    let profiles = ProfileService::new(store.clone());
    let user = profiles.login(user, password)?;
    let opponent = opponent.unwrap_or_else(|| config.default_opponent().clone());

    info!(user = %user.username(), %opponent, "Starting match");

    let history = HistoryRepository::new(store.clone(), config.stats_key().clone());
    let mut session = GameSession::new(
        user.username().clone(),
        opponent,
        HistoryRecorder::new(history),
    )
    .context("Cannot start a match")?;

    let stdin = std::io::stdin();
    gamerzo::run_console(&mut session, stdin.lock(), std::io::stdout())?;

    if let Some(e) = session.listener().last_error() {
        warn!(error = %e, "Last game result was not recorded");
        eprintln!("Failed to save game: {}", e);
    }
    Ok(())
}

/// Print counters
#[instrument(skip(config, store))]
fn run_stats(config: &AppConfig, store: &SqliteStore, user: &str) -> Result<()> {
    let history = HistoryRepository::new(store.clone(), config.stats_key().clone());
    let snapshot = history.snapshot()?;
    let mine = history.user_stats(user)?;

    println!("Game Statistics");
    println!("  Total Games: {}", snapshot.total_games());
    println!("  X Wins:      {}", snapshot.x_wins());
    println!("  O Wins:      {}", snapshot.o_wins());
    println!("  Draws:       {}", snapshot.draws());
    println!();
    println!("Player Stats ({})", user);
    println!("  Games Played: {}", mine.total_games());
    println!("  Wins:         {}", mine.wins());
    println!("  Losses:       {}", mine.losses());
    println!("  Draws:        {}", mine.draws());
    println!("  Win Rate:     {:.1}%", mine.win_rate());
    Ok(())
}

/// Print recent matches
#[instrument(skip(config, store))]
fn run_history(
    config: &AppConfig,
    store: &SqliteStore,
    user: &str,
    limit: Option<usize>,
) -> Result<()> {
    let history = HistoryRepository::new(store.clone(), config.stats_key().clone());
    let entries = history.history_for(user, limit.unwrap_or(*config.history_limit()))?;

    if entries.is_empty() {
        println!("No games played yet");
        return Ok(());
    }

    println!("{:<18} {:<28} Result", "Date", "Players");
    for entry in entries {
        let players = format!("{} vs {}", entry.record.player1(), entry.record.player2());
        println!(
            "{:<18} {:<28} {}",
            entry.record.display_date(),
            players,
            entry.result_label()
        );
    }
    Ok(())
}
