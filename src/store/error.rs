//! Store error types.

use derive_more::{Display, Error};

/// What went wrong in a store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StoreErrorKind {
    /// The database file could not be opened.
    #[display("connection")]
    Connection,
    /// Schema setup failed.
    #[display("migration")]
    Migration,
    /// A query failed.
    #[display("query")]
    Query,
    /// A blob is not the JSON its reader expects.
    #[display("malformed blob")]
    Malformed,
    /// A writer panicked while holding the in-memory map.
    #[display("poisoned lock")]
    Poisoned,
}

/// Storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store {} error: {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Failure category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a store error at the caller's location.
    #[track_caller]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(StoreErrorKind::Query, err.to_string())
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(StoreErrorKind::Connection, err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::Malformed, err.to_string())
    }
}
