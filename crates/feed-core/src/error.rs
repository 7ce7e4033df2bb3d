//! Error types shared by every feed loader

use std::fmt;

/// Error produced by a persistence backend.
///
/// Backends keep their own error enums; they cross the store boundary boxed.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by feed loaders and feed caches
#[derive(Debug)]
pub enum FeedError {
    /// The remote source could not be reached
    Connectivity,
    /// The remote source answered with something that is not a feed
    InvalidData,
    /// The local store failed to load, delete or insert
    Store(StoreError),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Connectivity => write!(f, "Connectivity error"),
            FeedError::InvalidData => write!(f, "Invalid feed data"),
            FeedError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::Store(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for FeedError {
    fn from(err: StoreError) -> Self {
        FeedError::Store(err)
    }
}

/// Errors surfaced by image data loaders and image data caches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedImageDataError {
    Connectivity,
    InvalidData,
    /// No usable bytes in the local cache (absent or unreadable)
    NotFound,
    /// Writing into the local cache failed
    Failed,
}

impl fmt::Display for FeedImageDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedImageDataError::Connectivity => write!(f, "Connectivity error"),
            FeedImageDataError::InvalidData => write!(f, "Invalid image data"),
            FeedImageDataError::NotFound => write!(f, "Image data not found"),
            FeedImageDataError::Failed => write!(f, "Failed to save image data"),
        }
    }
}

impl std::error::Error for FeedImageDataError {}
