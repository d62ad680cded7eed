//! Pure tic-tac-toe logic for Gamerzo.
//!
//! Two layers, neither of which performs I/O:
//!
//! - [`GameEngine`]: the match state machine (board, turn, terminal detection).
//! - [`StatsAggregator`]: counters folded from finished-match [`GameRecord`]s.
//!
//! ```
//! use gamerzo_tictactoe::{GameEngine, GameStatus, Mark, MoveError};
//!
//! let engine = GameEngine::replay(&[0, 4, 1, 5, 2]).unwrap();
//! assert_eq!(engine.status(), GameStatus::WonBy(Mark::X));
//! assert_eq!(engine.apply_move(8), Err(MoveError::GameAlreadyOver));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod engine;
mod position;
mod record;
pub mod rules;
mod stats;
mod types;

pub use action::{Move, MoveError};
pub use engine::{GameEngine, Transition};
pub use position::Position;
pub use record::{GameRecord, RecordError, validate_participants};
pub use rules::evaluate_termination;
pub use stats::{
    Classification, StatsAggregator, StatsError, StatsSnapshot, UserStats, aggregate,
    aggregate_for, classify,
};
pub use types::{Board, Cell, GameStatus, Mark};
