//! Match history persistence.
//!
//! Records are stored newest first as a JSON array under `"<stats_key>:games"`.
//! The counters blob under `"<stats_key>"` is rewritten from a full
//! re-aggregation after each record so external readers see a consistent
//! snapshot, but reads here always recompute from the records.

use chrono::{DateTime, Utc};
use gamerzo_tictactoe::{
    Classification, GameRecord, GameStatus, RecordError, StatsSnapshot, UserStats, aggregate,
    aggregate_for, classify,
};
use tracing::{debug, error, info, instrument};

use crate::store::{KeyValueStore, StoreError};

/// Error from recording a match.
#[derive(Debug, Clone, derive_more::Display)]
pub enum HistoryError {
    /// The match cannot be turned into a record.
    #[display("{}", _0)]
    Record(RecordError),

    /// The store failed before the record was saved.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for HistoryError {}

impl From<RecordError> for HistoryError {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}

impl From<StoreError> for HistoryError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// One row of a history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The stored record.
    pub record: GameRecord,
    /// Its classification, `None` for an inconsistent record.
    pub outcome: Option<Classification>,
}

impl HistoryEntry {
    /// Result column text.
    pub fn result_label(&self) -> String {
        match self.outcome {
            Some(outcome) => outcome.describe(&self.record),
            None => "Unknown".to_string(),
        }
    }
}

/// Reads and writes match records in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct HistoryRepository<S> {
    store: S,
    stats_key: String,
}

impl<S: KeyValueStore> HistoryRepository<S> {
    /// Creates a repository using `stats_key` as the key prefix.
    #[instrument(skip(store))]
    pub fn new(store: S, stats_key: String) -> Self {
        info!("Creating HistoryRepository");
        Self { store, stats_key }
    }

    /// Key prefix in use.
    pub fn stats_key(&self) -> &str {
        &self.stats_key
    }

    fn games_key(&self) -> String {
        format!("{}:games", self.stats_key)
    }

    /// Loads all records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails or the blob is malformed.
    #[instrument(skip(self))]
    pub fn load_records(&self) -> Result<Vec<GameRecord>, StoreError> {
        let records = self
            .store
            .get_json::<Vec<GameRecord>>(&self.games_key())?
            .unwrap_or_default();
        debug!(count = records.len(), "Records loaded");
        Ok(records)
    }

    /// Records a finished match played now.
    ///
    /// See [`HistoryRepository::record_at`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the match cannot be recorded.
    pub fn record(
        &self,
        status: GameStatus,
        player1: &str,
        player2: &str,
    ) -> Result<GameRecord, HistoryError> {
        self.record_at(Utc::now(), status, player1, player2)
    }

    /// Turns a terminal `status` into a [`GameRecord`] and persists it.
    ///
    /// `player1` played X and `player2` played O. The new id is one past the
    /// highest stored id. Once the record is saved the call succeeds; a failed
    /// counters write is only logged, since reads here recompute the counters.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Record`] if the match is unfinished or the names could
    ///   not identify the winner. Nothing is written.
    /// - [`HistoryError::Store`] if the records could not be read or saved.
    #[instrument(skip(self))]
    pub fn record_at(
        &self,
        date: DateTime<Utc>,
        status: GameStatus,
        player1: &str,
        player2: &str,
    ) -> Result<GameRecord, HistoryError> {
        let mut records = self.load_records()?;
        let id = records.iter().map(|r| *r.id()).max().unwrap_or(0) + 1;
        let record = GameRecord::from_status(id, date, status, player1, player2)?;

        records.insert(0, record.clone());
        self.store.put_json(&self.games_key(), &records)?;

        let snapshot = aggregate(&records);
        if let Err(e) = self.store.put_json(&self.stats_key, &snapshot) {
            error!(error = %e, "Match recorded, counters blob is stale");
        }

        info!(
            id,
            winner = ?record.winner(),
            total = *snapshot.total_games(),
            "Match recorded"
        );
        Ok(record)
    }

    /// Mark-based counters recomputed from the stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> Result<StatsSnapshot, StoreError> {
        Ok(aggregate(&self.load_records()?))
    }

    /// The counters blob as last written, zeroes if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails or the blob is malformed.
    #[instrument(skip(self))]
    pub fn stored_counters(&self) -> Result<StatsSnapshot, StoreError> {
        Ok(self
            .store
            .get_json::<StatsSnapshot>(&self.stats_key)?
            .unwrap_or_default())
    }

    /// Counters from `user`'s side, over the matches `user` played.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails.
    #[instrument(skip(self))]
    pub fn user_stats(&self, user: &str) -> Result<UserStats, StoreError> {
        let records: Vec<GameRecord> = self
            .load_records()?
            .into_iter()
            .filter(|r| r.involves(user))
            .collect();
        Ok(aggregate_for(&records, user))
    }

    /// Most recent matches `user` played, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails.
    #[instrument(skip(self))]
    pub fn history_for(&self, user: &str, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let entries: Vec<HistoryEntry> = self
            .load_records()?
            .into_iter()
            .filter(|r| r.involves(user))
            .take(limit)
            .map(|record| HistoryEntry {
                outcome: classify(&record).ok(),
                record,
            })
            .collect();
        debug!(count = entries.len(), "History loaded");
        Ok(entries)
    }

    /// Deletes every record and the counters blob.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store fails.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.games_key())?;
        self.store.remove(&self.stats_key)?;
        info!("History cleared");
        Ok(())
    }
}
