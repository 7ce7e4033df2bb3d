//! Error types for the SQLite store

use std::fmt;

#[derive(Debug)]
pub enum SqliteStoreError {
    Database(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    /// Preparing the database location failed
    Io(std::io::Error),
    /// A stored row could not be mapped back to a feed item
    InvalidRow(String),
}

impl fmt::Display for SqliteStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqliteStoreError::Database(e) => write!(f, "Database error: {e}"),
            SqliteStoreError::Migrate(e) => write!(f, "Migration failed: {e}"),
            SqliteStoreError::Io(e) => write!(f, "IO error: {e}"),
            SqliteStoreError::InvalidRow(msg) => write!(f, "Invalid stored row: {msg}"),
        }
    }
}

impl std::error::Error for SqliteStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SqliteStoreError::Database(e) => Some(e),
            SqliteStoreError::Migrate(e) => Some(e),
            SqliteStoreError::Io(e) => Some(e),
            SqliteStoreError::InvalidRow(_) => None,
        }
    }
}

impl From<sqlx::Error> for SqliteStoreError {
    fn from(err: sqlx::Error) -> Self {
        SqliteStoreError::Database(err)
    }
}

impl From<sqlx::migrate::MigrateError> for SqliteStoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SqliteStoreError::Migrate(err)
    }
}

impl From<std::io::Error> for SqliteStoreError {
    fn from(err: std::io::Error) -> Self {
        SqliteStoreError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, SqliteStoreError>;
