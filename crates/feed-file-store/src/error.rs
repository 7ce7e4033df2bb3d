//! Error types for the file store

use std::fmt;

#[derive(Debug)]
pub enum FileStoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStoreError::Io(e) => write!(f, "IO error: {e}"),
            FileStoreError::Json(e) => write!(f, "Corrupt feed snapshot: {e}"),
        }
    }
}

impl std::error::Error for FileStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileStoreError::Io(e) => Some(e),
            FileStoreError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for FileStoreError {
    fn from(err: std::io::Error) -> Self {
        FileStoreError::Io(err)
    }
}

impl From<serde_json::Error> for FileStoreError {
    fn from(err: serde_json::Error) -> Self {
        FileStoreError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, FileStoreError>;
