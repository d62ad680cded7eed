//! A single local match between a signed-in user and an opponent.
//!
//! The session is the one place front ends talk to the game: they submit
//! cell indices and read the engine back. It owns the engine for the match
//! and fires a [`GameEndListener`] on the move that finishes it.

use gamerzo_tictactoe::{
    GameEngine, GameRecord, GameStatus, Mark, MoveError, RecordError, validate_participants,
};
use tracing::{debug, error, info, instrument, warn};

use crate::history::{HistoryError, HistoryRepository};
use crate::store::KeyValueStore;

/// Summary handed to a [`GameEndListener`] when a match finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEnd {
    /// Terminal status reached.
    pub status: GameStatus,
    /// Participant playing X.
    pub player1: String,
    /// Participant playing O.
    pub player2: String,
    /// Number of moves played.
    pub moves: usize,
}

impl GameEnd {
    /// Name of the winning participant, `None` for a draw.
    pub fn winner(&self) -> Option<&str> {
        match self.status.winner()? {
            Mark::X => Some(&self.player1),
            Mark::O => Some(&self.player2),
        }
    }
}

/// Receives the end of each match.
pub trait GameEndListener {
    /// Called exactly once per match, on the move that finishes it.
    fn on_game_end(&mut self, end: &GameEnd);
}

/// Listener that ignores every match.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl GameEndListener for NoopListener {
    fn on_game_end(&mut self, _end: &GameEnd) {}
}

/// Listener that persists each finished match through a [`HistoryRepository`].
///
/// A failed write is logged and kept in [`HistoryRecorder::last_error`]; the
/// match itself is unaffected.
#[derive(Debug, Clone)]
pub struct HistoryRecorder<S> {
    repository: HistoryRepository<S>,
    last_record: Option<GameRecord>,
    last_error: Option<HistoryError>,
}

impl<S: KeyValueStore> HistoryRecorder<S> {
    /// Creates a recorder writing to `repository`.
    pub fn new(repository: HistoryRepository<S>) -> Self {
        Self {
            repository,
            last_record: None,
            last_error: None,
        }
    }

    /// The repository written to.
    pub fn repository(&self) -> &HistoryRepository<S> {
        &self.repository
    }

    /// The most recently saved record.
    pub fn last_record(&self) -> Option<&GameRecord> {
        self.last_record.as_ref()
    }

    /// The most recent write failure, cleared by the next successful write.
    pub fn last_error(&self) -> Option<&HistoryError> {
        self.last_error.as_ref()
    }
}

impl<S: KeyValueStore> GameEndListener for HistoryRecorder<S> {
    #[instrument(skip(self), fields(status = ?end.status))]
    fn on_game_end(&mut self, end: &GameEnd) {
        match self.repository.record(end.status, &end.player1, &end.player2) {
            Ok(record) => {
                debug!(id = *record.id(), "Game end recorded");
                self.last_record = Some(record);
                self.last_error = None;
            }
            Err(e) => {
                error!(error = %e, "Failed to save game");
                self.last_error = Some(e);
            }
        }
    }
}

/// One match between `player1` (X) and `player2` (O).
///
/// Moves go through `&mut self`, so a session is only ever driven by one
/// caller at a time.
#[derive(Debug)]
pub struct GameSession<L> {
    player1: String,
    player2: String,
    engine: GameEngine,
    listener: L,
}

impl<L: GameEndListener> GameSession<L> {
    /// Starts a fresh match.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the names are blank or equal: the finished
    /// match could not say who won.
    #[instrument(skip(listener))]
    pub fn new(player1: String, player2: String, listener: L) -> Result<Self, RecordError> {
        validate_participants(&player1, &player2).inspect_err(|e| {
            warn!(error = %e, "Session rejected");
        })?;

        info!("Creating game session");
        Ok(Self {
            player1,
            player2,
            engine: GameEngine::new_game(),
            listener,
        })
    }

    /// Submits a move for whoever is to play.
    ///
    /// Returns the terminal status when this move finished the match, firing
    /// the listener once; `None` while the match continues.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`MoveError`]; the session is unchanged.
    #[instrument(skip(self), fields(turn = %self.engine.turn()))]
    pub fn submit_move(&mut self, index: usize) -> Result<Option<GameStatus>, MoveError> {
        let transition = self.engine.play(index).map_err(|e| {
            warn!(error = %e, "Move rejected");
            e
        })?;

        let ended = transition.ended();
        self.engine = transition.into_engine();

        if let Some(status) = ended {
            let end = GameEnd {
                status,
                player1: self.player1.clone(),
                player2: self.player2.clone(),
                moves: self.engine.history().len(),
            };
            info!(?status, winner = ?end.winner(), "Match over");
            self.listener.on_game_end(&end);
        }

        Ok(ended)
    }

    /// Abandons the current match and starts a fresh one. Never fires the listener.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.engine = self.engine.reset();
        debug!("Session reset");
    }

    /// Current engine snapshot.
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Participant playing X.
    pub fn player1(&self) -> &str {
        &self.player1
    }

    /// Participant playing O.
    pub fn player2(&self) -> &str {
        &self.player2
    }

    /// Name of the participant playing `mark`.
    pub fn player_for(&self, mark: Mark) -> &str {
        match mark {
            Mark::X => &self.player1,
            Mark::O => &self.player2,
        }
    }

    /// The listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// One-line status for display.
    pub fn status_line(&self) -> String {
        match self.engine.status() {
            GameStatus::InProgress => {
                let turn = self.engine.turn();
                format!("Player {}'s turn ({})", turn, self.player_for(turn))
            }
            GameStatus::WonBy(mark) => {
                format!("Player {} wins! ({})", mark, self.player_for(mark))
            }
            GameStatus::Draw => "It's a draw!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Collect(Vec<GameEnd>);

    impl GameEndListener for Collect {
        fn on_game_end(&mut self, end: &GameEnd) {
            self.0.push(end.clone());
        }
    }

    fn session() -> GameSession<Collect> {
        GameSession::new("alice".to_string(), "CPU".to_string(), Collect::default())
            .expect("Distinct names")
    }

    #[test]
    fn test_status_line_follows_turn() {
        let mut s = session();
        assert_eq!(s.status_line(), "Player X's turn (alice)");
        s.submit_move(4).unwrap();
        assert_eq!(s.status_line(), "Player O's turn (CPU)");
    }

    #[test]
    fn test_rejected_move_leaves_session_unchanged() {
        let mut s = session();
        s.submit_move(4).unwrap();
        let before = s.engine().clone();
        assert_eq!(
            s.submit_move(4),
            Err(MoveError::CellOccupied(gamerzo_tictactoe::Position::Center))
        );
        assert_eq!(s.submit_move(9), Err(MoveError::OutOfRange(9)));
        assert_eq!(s.engine(), &before);
    }

    #[test]
    fn test_new_rejects_shared_name() {
        let result = GameSession::new("alice".to_string(), "alice".to_string(), NoopListener);
        assert!(matches!(result, Err(RecordError::SameParticipants(name)) if name == "alice"));

        let result = GameSession::new("alice".to_string(), String::new(), NoopListener);
        assert!(matches!(result, Err(RecordError::BlankParticipant)));
    }

    #[test]
    fn test_game_end_winner_name() {
        let end = GameEnd {
            status: GameStatus::WonBy(Mark::O),
            player1: "alice".to_string(),
            player2: "CPU".to_string(),
            moves: 6,
        };
        assert_eq!(end.winner(), Some("CPU"));
    }
}
