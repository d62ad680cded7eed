//! Statistics derived from finished-match records.
//!
//! Every count here is a fold over [`GameRecord`]s. Nothing is trusted from a
//! previous fold: callers re-aggregate on each read, and because the fold is
//! commutative and associative, re-aggregating always agrees with folding
//! incrementally.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::GameRecord;

/// Who won a recorded match, relative to its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// `player1` (X) won.
    Player1Won,
    /// `player2` (O) won.
    Player2Won,
    /// Nobody won.
    Draw,
}

impl Classification {
    /// Name of the participant who won `record`, `None` for a draw.
    pub fn winner<'a>(self, record: &'a GameRecord) -> Option<&'a str> {
        match self {
            Classification::Player1Won => Some(record.player1()),
            Classification::Player2Won => Some(record.player2()),
            Classification::Draw => None,
        }
    }

    /// Result label for history tables: `"<name> won"` or `"Draw"`.
    pub fn describe(self, record: &GameRecord) -> String {
        match self.winner(record) {
            Some(name) => format!("{} won", name),
            None => "Draw".to_string(),
        }
    }
}

/// Error raised while reading records.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StatsError {
    /// The winner named in a record is not one of its participants.
    #[display(
        "Record {} names winner '{}' who is neither '{}' nor '{}'",
        id,
        winner,
        player1,
        player2
    )]
    InconsistentRecord {
        /// Record id.
        id: i64,
        /// The unknown winner.
        winner: String,
        /// First participant.
        player1: String,
        /// Second participant.
        player2: String,
    },

    /// Both participants share a name, so a named winner fits either mark.
    #[display("Record {} names winner '{}' who played both sides", id, winner)]
    AmbiguousRecord {
        /// Record id.
        id: i64,
        /// The shared name.
        winner: String,
    },
}

impl std::error::Error for StatsError {}

/// Classifies a record into exactly one of three outcomes.
///
/// # Errors
///
/// - [`StatsError::InconsistentRecord`] when `winner` names neither participant.
/// - [`StatsError::AmbiguousRecord`] when a winner is set and both participants
///   share its name.
///
/// A blank `winner` counts as no winner. Records built by the engine never hit
/// either error, but records read back from storage might.
pub fn classify(record: &GameRecord) -> Result<Classification, StatsError> {
    let winner = record
        .winner()
        .as_deref()
        .filter(|winner| !winner.trim().is_empty());

    match winner {
        None => Ok(Classification::Draw),
        Some(winner) if record.player1() == record.player2() => {
            Err(StatsError::AmbiguousRecord {
                id: *record.id(),
                winner: winner.to_string(),
            })
        }
        Some(winner) if winner == record.player1() => Ok(Classification::Player1Won),
        Some(winner) if winner == record.player2() => Ok(Classification::Player2Won),
        Some(winner) => Err(StatsError::InconsistentRecord {
            id: *record.id(),
            winner: winner.to_string(),
            player1: record.player1().clone(),
            player2: record.player2().clone(),
        }),
    }
}

/// Mark-based counters over every record.
///
/// Serializes as `{"totalGames", "xWins", "oWins", "draws"}`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters,
)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    total_games: u32,
    x_wins: u32,
    o_wins: u32,
    draws: u32,
}

impl StatsSnapshot {
    /// Creates a snapshot from raw counters.
    pub fn new(total_games: u32, x_wins: u32, o_wins: u32, draws: u32) -> Self {
        Self {
            total_games,
            x_wins,
            o_wins,
            draws,
        }
    }

    /// Adds one classified match.
    pub fn add(self, outcome: Classification) -> Self {
        let mut next = self;
        next.total_games += 1;
        match outcome {
            Classification::Player1Won => next.x_wins += 1,
            Classification::Player2Won => next.o_wins += 1,
            Classification::Draw => next.draws += 1,
        }
        next
    }

    /// Combines two partial folds.
    pub fn merge(self, other: Self) -> Self {
        Self {
            total_games: self.total_games + other.total_games,
            x_wins: self.x_wins + other.x_wins,
            o_wins: self.o_wins + other.o_wins,
            draws: self.draws + other.draws,
        }
    }
}

/// Wins, losses and draws seen from one user's side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    total_games: u32,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl UserStats {
    /// Creates stats from raw counters.
    pub fn new(total_games: u32, wins: u32, losses: u32, draws: u32) -> Self {
        Self {
            total_games,
            wins,
            losses,
            draws,
        }
    }

    /// Win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.total_games as f64) * 100.0
        }
    }
}

/// Folds records into mark-based counters.
///
/// `player1` plays X, so a `Player1Won` record counts toward `x_wins`.
/// Inconsistent records are logged and left out, so
/// `total_games == x_wins + o_wins + draws` always holds.
#[instrument(skip(records), fields(records = records.len()))]
pub fn aggregate(records: &[GameRecord]) -> StatsSnapshot {
    let snapshot = records
        .iter()
        .filter_map(classify_or_warn)
        .fold(StatsSnapshot::default(), StatsSnapshot::add);
    debug!(?snapshot, "Aggregated records");
    snapshot
}

/// Folds records into counters for the viewing `user`.
///
/// A record is a win if `winner == user`, a loss if a different winner is set,
/// and a draw if no winner is set. Inconsistent records are logged and left out.
#[instrument(skip(records), fields(records = records.len()))]
pub fn aggregate_for(records: &[GameRecord], user: &str) -> UserStats {
    let stats = records
        .iter()
        .filter_map(|record| classify_or_warn(record).map(|outcome| (record, outcome)))
        .fold(UserStats::default(), |mut acc, (record, outcome)| {
            acc.total_games += 1;
            match outcome.winner(record) {
                None => acc.draws += 1,
                Some(winner) if winner == user => acc.wins += 1,
                Some(_) => acc.losses += 1,
            }
            acc
        });
    debug!(?stats, "Aggregated user records");
    stats
}

fn classify_or_warn(record: &GameRecord) -> Option<Classification> {
    match classify(record) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            warn!(error = %e, "Skipping inconsistent record");
            None
        }
    }
}

/// Owner of the finished-match sequence.
///
/// Snapshots are recomputed from the records on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsAggregator {
    records: Vec<GameRecord>,
}

impl StatsAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregator over existing records.
    pub fn from_records(records: Vec<GameRecord>) -> Self {
        Self { records }
    }

    /// Appends a finished match.
    #[instrument(skip(self, record), fields(id = *record.id()))]
    pub fn record(&mut self, record: GameRecord) {
        self.records.push(record);
    }

    /// Recorded matches in insertion order.
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    /// Mark-based counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        aggregate(&self.records)
    }

    /// Counters from `user`'s side.
    pub fn user_stats(&self, user: &str) -> UserStats {
        aggregate_for(&self.records, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: i64, winner: Option<&str>) -> GameRecord {
        let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        GameRecord::new(id, date, winner.map(str::to_string), "alice", "CPU")
    }

    #[test]
    fn test_classify_three_ways() {
        assert_eq!(classify(&record(1, Some("alice"))), Ok(Classification::Player1Won));
        assert_eq!(classify(&record(2, Some("CPU"))), Ok(Classification::Player2Won));
        assert_eq!(classify(&record(3, None)), Ok(Classification::Draw));
    }

    #[test]
    fn test_classify_unknown_winner() {
        let err = classify(&record(9, Some("mallory"))).unwrap_err();
        assert!(matches!(err, StatsError::InconsistentRecord { id: 9, .. }));
        assert!(err.to_string().contains("mallory"));
    }

    #[test]
    fn test_classify_same_participants() {
        let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let won = GameRecord::new(5, date, Some("alice".to_string()), "alice", "alice");
        let drawn = GameRecord::new(6, date, None, "alice", "alice");

        assert!(matches!(
            classify(&won),
            Err(StatsError::AmbiguousRecord { id: 5, .. })
        ));
        assert_eq!(classify(&drawn), Ok(Classification::Draw));
    }

    #[test]
    fn test_describe() {
        let r = record(1, Some("CPU"));
        assert_eq!(classify(&r).unwrap().describe(&r), "CPU won");
        let d = record(2, None);
        assert_eq!(classify(&d).unwrap().describe(&d), "Draw");
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(StatsSnapshot::new(4, 2, 1, 1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"totalGames": 4, "xWins": 2, "oWins": 1, "draws": 1})
        );
    }

    #[test]
    fn test_merge_matches_single_fold() {
        let records = vec![
            record(1, Some("alice")),
            record(2, None),
            record(3, Some("CPU")),
            record(4, Some("alice")),
        ];
        let (left, right) = records.split_at(1);
        assert_eq!(aggregate(left).merge(aggregate(right)), aggregate(&records));
    }

    #[test]
    fn test_win_rate() {
        assert_eq!(UserStats::default().win_rate(), 0.0);
        assert!((UserStats::new(4, 1, 2, 1).win_rate() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregator_recomputes() {
        let mut stats = StatsAggregator::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
        stats.record(record(1, Some("alice")));
        stats.record(record(2, Some("mallory")));
        assert_eq!(stats.snapshot(), StatsSnapshot::new(1, 1, 0, 0));
        assert_eq!(stats.user_stats("alice"), UserStats::new(1, 1, 0, 0));
        assert_eq!(stats.records().len(), 2);
    }
}
