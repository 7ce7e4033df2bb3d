//! Error types for the feed client

use std::fmt;

#[derive(Debug)]
pub enum FeedClientError {
    Config(String),
    Api(feed_api::FeedApiError),
    Store(feed_sqlite_store::SqliteStoreError),
    Feed(feed_core::FeedError),
    /// A load's completion was dropped without being delivered
    Interrupted(&'static str),
}

impl fmt::Display for FeedClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedClientError::Config(msg) => write!(f, "Configuration error: {}", msg),
            FeedClientError::Api(err) => write!(f, "Feed API error: {}", err),
            FeedClientError::Store(err) => write!(f, "Store error: {}", err),
            FeedClientError::Feed(err) => write!(f, "Feed load failed: {}", err),
            FeedClientError::Interrupted(what) => write!(f, "Interrupted: {}", what),
        }
    }
}

impl std::error::Error for FeedClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedClientError::Api(err) => Some(err),
            FeedClientError::Store(err) => Some(err),
            FeedClientError::Feed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<feed_api::FeedApiError> for FeedClientError {
    fn from(err: feed_api::FeedApiError) -> Self {
        FeedClientError::Api(err)
    }
}

impl From<feed_sqlite_store::SqliteStoreError> for FeedClientError {
    fn from(err: feed_sqlite_store::SqliteStoreError) -> Self {
        FeedClientError::Store(err)
    }
}

impl From<feed_core::FeedError> for FeedClientError {
    fn from(err: feed_core::FeedError) -> Self {
        FeedClientError::Feed(err)
    }
}

impl From<tracing_subscriber::filter::ParseError> for FeedClientError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        FeedClientError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = FeedClientError::Config("invalid FEED_URL".to_string());
        assert_eq!(format!("{}", err), "Configuration error: invalid FEED_URL");
    }

    #[test]
    fn test_feed_error_display_and_source() {
        let err = FeedClientError::from(feed_core::FeedError::Connectivity);
        assert_eq!(format!("{}", err), "Feed load failed: Connectivity error");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_interrupted_has_no_source() {
        let err = FeedClientError::Interrupted("feed load");
        assert!(std::error::Error::source(&err).is_none());
        assert!(format!("{:?}", err).contains("Interrupted"));
    }
}
