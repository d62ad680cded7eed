//! Finished-match records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{GameStatus, Mark};

/// Reason a match cannot be turned into a [`GameRecord`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RecordError {
    /// The match has not reached a terminal status.
    #[display("Match is still in progress")]
    Unfinished,

    /// A participant name is empty.
    #[display("Participant names must not be empty")]
    BlankParticipant,

    /// Both participants share a name, so the winner could not be told apart.
    #[display("Both participants are named '{}'", _0)]
    SameParticipants(String),
}

impl std::error::Error for RecordError {}

/// Checks that two participant names can identify the winner of a match.
///
/// A record names its winner, so the names must be non-blank and distinct.
///
/// # Errors
///
/// - [`RecordError::BlankParticipant`] if either name is blank.
/// - [`RecordError::SameParticipants`] if the names are equal.
pub fn validate_participants(player1: &str, player2: &str) -> Result<(), RecordError> {
    if player1.trim().is_empty() || player2.trim().is_empty() {
        return Err(RecordError::BlankParticipant);
    }
    if player1 == player2 {
        return Err(RecordError::SameParticipants(player1.to_string()));
    }
    Ok(())
}

/// Immutable log entry for one finished match.
///
/// Serializes to `{"id", "date", "winner", "player1", "player2"}` with `date`
/// as an RFC 3339 timestamp and `winner` as `null` for a draw. `player1` plays
/// X and `player2` plays O.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameRecord {
    id: i64,
    date: DateTime<Utc>,
    winner: Option<String>,
    player1: String,
    player2: String,
}

impl GameRecord {
    /// Creates a record from raw fields.
    pub fn new(
        id: i64,
        date: DateTime<Utc>,
        winner: Option<String>,
        player1: impl Into<String>,
        player2: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            winner,
            player1: player1.into(),
            player2: player2.into(),
        }
    }

    /// Builds the record for a match that ended with `status`.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Unfinished`] for a match still in progress.
    /// - [`RecordError::BlankParticipant`] or [`RecordError::SameParticipants`]
    ///   when the names could not identify the winner.
    #[instrument(skip(player1, player2))]
    pub fn from_status(
        id: i64,
        date: DateTime<Utc>,
        status: GameStatus,
        player1: impl Into<String>,
        player2: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let (player1, player2) = (player1.into(), player2.into());
        validate_participants(&player1, &player2).inspect_err(|e| {
            warn!(error = %e, "Refusing to record match");
        })?;

        let winner = match status {
            GameStatus::InProgress => {
                warn!("Refusing to record an unfinished match");
                return Err(RecordError::Unfinished);
            }
            GameStatus::WonBy(Mark::X) => Some(player1.clone()),
            GameStatus::WonBy(Mark::O) => Some(player2.clone()),
            GameStatus::Draw => None,
        };
        Ok(Self::new(id, date, winner, player1, player2))
    }

    /// Checks whether `user` played in this match.
    pub fn involves(&self, user: &str) -> bool {
        self.player1 == user || self.player2 == user
    }

    /// Date formatted for history tables, e.g. `Oct 19, 02:15 PM`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %I:%M %p").to_string()
    }
}
