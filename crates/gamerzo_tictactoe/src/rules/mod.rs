//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from the engine so
//! they can be evaluated on any board, including ones loaded from elsewhere.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};

use crate::{Board, GameStatus};
use tracing::instrument;

/// Evaluates the status of a board.
///
/// Lines are checked before fullness, so a move that completes a line while
/// filling the last empty cell reports the win.
#[instrument(skip(board))]
pub fn evaluate_termination(board: &Board) -> GameStatus {
    if let Some(mark) = check_winner(board) {
        return GameStatus::WonBy(mark);
    }
    if is_full(board) {
        return GameStatus::Draw;
    }
    GameStatus::InProgress
}
