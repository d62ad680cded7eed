//! Tic-tac-toe state machine.
//!
//! A [`GameEngine`] value is one immutable snapshot of a match. Moves never
//! mutate the receiver: [`GameEngine::apply_move`] either returns a new
//! snapshot or an error, so a rejected move has no observable effect.
//!
//! ```text
//!              apply_move (ok)
//!            ┌──────────────┐
//!            ▼              │
//!      ┌────────────┐───────┘      ┌──────────────┐
//!      │ InProgress │─────────────▶│ WonBy / Draw │──┐ apply_move
//!      └────────────┘  line / full └──────────────┘◀─┘ GameAlreadyOver
//! ```

use tracing::{debug, info, instrument};

use crate::action::{Move, MoveError};
use crate::rules::evaluate_termination;
use crate::{Board, Cell, GameStatus, Mark, Position};

/// One snapshot of a match: board, mark to move, status and move log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    turn: Mark,
    status: GameStatus,
    history: Vec<Move>,
}

/// Result of an accepted move.
///
/// `Ended` is produced only on the edge from `InProgress` into a terminal
/// status. A terminal engine rejects every move, so a match yields at most one
/// `Ended`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Match continues with the other mark to move.
    Continued(GameEngine),
    /// This move finished the match.
    Ended(GameEngine),
}

impl Transition {
    /// Returns the engine after the move.
    pub fn engine(&self) -> &GameEngine {
        match self {
            Transition::Continued(engine) | Transition::Ended(engine) => engine,
        }
    }

    /// Consumes the transition, returning the engine after the move.
    pub fn into_engine(self) -> GameEngine {
        match self {
            Transition::Continued(engine) | Transition::Ended(engine) => engine,
        }
    }

    /// Terminal status reached by this move, if it finished the match.
    pub fn ended(&self) -> Option<GameStatus> {
        match self {
            Transition::Continued(_) => None,
            Transition::Ended(engine) => Some(engine.status),
        }
    }
}

impl GameEngine {
    /// Creates a fresh match: empty board, X to move.
    #[instrument]
    pub fn new_game() -> Self {
        Self {
            board: Board::new(),
            turn: Mark::X,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Discards this match and returns a fresh one.
    #[instrument(skip(self), fields(moves = self.history.len()))]
    pub fn reset(&self) -> Self {
        debug!(status = ?self.status, "Resetting match");
        Self::new_game()
    }

    /// Places the current mark at `index` and returns the resulting engine.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameAlreadyOver`] once the status is terminal.
    /// - [`MoveError::OutOfRange`] if `index` is not in 0..=8.
    /// - [`MoveError::CellOccupied`] if the cell already carries a mark.
    pub fn apply_move(&self, index: usize) -> Result<GameEngine, MoveError> {
        self.play(index).map(Transition::into_engine)
    }

    /// Like [`GameEngine::apply_move`], but reports whether the move ended the match.
    #[instrument(skip(self), fields(turn = %self.turn, status = ?self.status))]
    pub fn play(&self, index: usize) -> Result<Transition, MoveError> {
        if self.status.is_terminal() {
            debug!("Move rejected, match is over");
            return Err(MoveError::GameAlreadyOver);
        }

        let position = Position::from_index(index).ok_or(MoveError::OutOfRange(index))?;

        if !self.board.is_empty(position) {
            debug!(%position, "Move rejected, cell occupied");
            return Err(MoveError::CellOccupied(position));
        }

        let mut next = self.clone();
        next.board.set(position, Cell::Marked(self.turn));
        next.history.push(Move::new(self.turn, position));
        next.status = evaluate_termination(&next.board);

        if next.status.is_terminal() {
            info!(
                %position,
                status = ?next.status,
                moves = next.history.len(),
                "Match finished"
            );
            return Ok(Transition::Ended(next));
        }

        next.turn = self.turn.opponent();
        debug!(%position, next_turn = %next.turn, "Move applied");
        Ok(Transition::Continued(next))
    }

    /// Replays a sequence of cell indices from a fresh match.
    ///
    /// # Errors
    ///
    /// Returns the first [`MoveError`] hit, including moves past the end of the match.
    #[instrument]
    pub fn replay(indices: &[usize]) -> Result<GameEngine, MoveError> {
        indices
            .iter()
            .try_fold(Self::new_game(), |engine, &index| engine.apply_move(index))
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mark to move next. After a win this is the winning mark.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    /// Returns the match status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Accepted moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Empty positions, empty once the match is over.
    pub fn valid_moves(&self) -> Vec<Position> {
        if self.status.is_terminal() {
            return Vec::new();
        }
        Position::valid_moves(&self.board)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new_game()
    }
}
