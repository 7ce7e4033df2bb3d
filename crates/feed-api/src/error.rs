//! Error types for the feed API client

use std::fmt;

/// Errors raised by the HTTP transport
#[derive(Debug)]
pub enum FeedApiError {
    /// HTTP request failed
    Http(reqwest::Error),
}

impl fmt::Display for FeedApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Feed API HTTP error: {}", e),
        }
    }
}

impl std::error::Error for FeedApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for FeedApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// Result type for feed API operations
pub type Result<T> = std::result::Result<T, FeedApiError>;
