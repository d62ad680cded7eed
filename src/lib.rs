//! Gamerzo library - tic-tac-toe with mock accounts and match history
//!
//! The game rules live in [`gamerzo_tictactoe`]; this crate wraps them with
//! the pieces a front end needs.
//!
//! # Architecture
//!
//! - **Session**: one match, submits moves and fires a listener on the final move
//! - **History**: match records and derived counters in a key-value store
//! - **Profiles**: mock accounts (a name and an id)
//! - **Store**: key-value blobs in memory or in SQLite
//!
//! # Example
//!
//! ```
//! use gamerzo::{GameSession, HistoryRecorder, HistoryRepository, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let history = HistoryRepository::new(store.clone(), "gameStats".to_string());
//! let mut session = GameSession::new(
//!     "alice".to_string(),
//!     "CPU".to_string(),
//!     HistoryRecorder::new(history.clone()),
//! )
//! .unwrap();
//!
//! for index in [0, 4, 1, 5, 2] {
//!     session.submit_move(index).unwrap();
//! }
//! assert_eq!(*history.snapshot().unwrap().x_wins(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod console;
mod history;
mod profile_service;
mod session;
mod store;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError};

// Crate-level exports - Console front end
pub use console::{Command as ConsoleCommand, run as run_console};

// Crate-level exports - History
pub use history::{HistoryEntry, HistoryError, HistoryRepository};

// Crate-level exports - Profiles
pub use profile_service::{ProfileError, ProfileService, User};

// Crate-level exports - Session management
pub use session::{GameEnd, GameEndListener, GameSession, HistoryRecorder, NoopListener};

// Crate-level exports - Storage
pub use store::{
    KeyValueStore, KvEntry, MemoryStore, NewKvEntry, SqliteStore, StoreError, StoreErrorKind,
};

// Crate-level exports - Game types
pub use gamerzo_tictactoe::{
    Board, Cell, Classification, GameEngine, GameRecord, GameStatus, Mark, Move, MoveError,
    Position, RecordError, StatsAggregator, StatsError, StatsSnapshot, Transition, UserStats,
    aggregate, aggregate_for, classify, evaluate_termination, validate_participants,
};
