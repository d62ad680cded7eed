//! SQLite-backed store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::store::{KeyValueStore, KvEntry, NewKvEntry, StoreError, StoreErrorKind, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Store backed by a SQLite file, one connection per call.
///
/// `":memory:"` does not work here: every call would see a fresh database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `db_path` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StoreError> {
        info!(path = %db_path, "Opening SqliteStore");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(StoreErrorKind::Migration, e.to_string()))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(
                StoreErrorKind::Connection,
                format!("'{}': {}", self.db_path, e),
            )
        })
    }

    /// Reads the full row under `key`, including its last write time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn entry(&self, key: &str) -> Result<Option<KvEntry>, StoreError> {
        let mut conn = self.connection()?;
        let entry = schema::kv_entries::table
            .find(key)
            .select(KvEntry::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(entry)
    }

    /// Lists all keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection()?;
        let keys = schema::kv_entries::table
            .select(schema::kv_entries::key)
            .order(schema::kv_entries::key.asc())
            .load::<String>(&mut conn)?;
        debug!(count = keys.len(), "Keys loaded");
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        let value = schema::kv_entries::table
            .find(key)
            .select(schema::kv_entries::value)
            .first::<String>(&mut conn)
            .optional()?;
        debug!(found = value.is_some(), "Read blob");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let entry = NewKvEntry::new(key.to_string(), value);
        diesel::replace_into(schema::kv_entries::table)
            .values(&entry)
            .execute(&mut conn)?;
        debug!("Wrote blob");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(schema::kv_entries::table.find(key)).execute(&mut conn)?;
        debug!(removed, "Removed blob");
        Ok(removed > 0)
    }
}
