//! Configuration loaded from the environment

use crate::error::{FeedClientError, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_FEED_URL: &str = "https://static1.squarespace.com/static/5891c5b8d1758ec68ef5dbc2/t/5db4155a4fbade21d17ecd28/1572083034355/essential_app_feed.json";

/// Persistence backend for the local cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Sqlite,
}

impl StoreKind {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "file" => Some(StoreKind::File),
            "sqlite" => Some(StoreKind::Sqlite),
            _ => None,
        }
    }

    fn default_path(self) -> PathBuf {
        match self {
            StoreKind::File => PathBuf::from("./cache/feed"),
            StoreKind::Sqlite => PathBuf::from("./cache/feed-store.sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: Url,
    pub store_kind: StoreKind,
    pub store_path: PathBuf,
    pub http_timeout: Duration,
    /// Load every item's image after the feed
    pub prefetch_images: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults,
    /// except `FEED_URL`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let feed_url = match lookup("FEED_URL") {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| FeedClientError::Config(format!("invalid FEED_URL {:?}: {}", raw, e)))?,
            None => Url::parse(DEFAULT_FEED_URL)
                .map_err(|e| FeedClientError::Config(e.to_string()))?,
        };

        let store_kind = lookup("STORE_KIND")
            .and_then(|s| StoreKind::parse(&s))
            .unwrap_or(StoreKind::Sqlite);

        let store_path = lookup("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| store_kind.default_path());

        let http_timeout = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let prefetch_images = lookup("PREFETCH_IMAGES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Config {
            feed_url,
            store_kind,
            store_path,
            http_timeout,
            prefetch_images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.feed_url.as_str(), DEFAULT_FEED_URL);
        assert_eq!(config.store_kind, StoreKind::Sqlite);
        assert_eq!(config.store_path, PathBuf::from("./cache/feed-store.sqlite"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(!config.prefetch_images);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("FEED_URL", "http://localhost:8080/feed.json"),
            ("STORE_KIND", "File"),
            ("STORE_PATH", "/tmp/feed-cache"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("PREFETCH_IMAGES", "true"),
        ])
        .unwrap();

        assert_eq!(config.feed_url.as_str(), "http://localhost:8080/feed.json");
        assert_eq!(config.store_kind, StoreKind::File);
        assert_eq!(config.store_path, PathBuf::from("/tmp/feed-cache"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert!(config.prefetch_images);
    }

    #[test]
    fn test_store_path_default_follows_store_kind() {
        let config = config_from(&[("STORE_KIND", "file")]).unwrap();
        assert_eq!(config.store_path, PathBuf::from("./cache/feed"));
    }

    #[test]
    fn test_unparsable_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("STORE_KIND", "postgres"),
            ("HTTP_TIMEOUT_SECS", "soon"),
            ("PREFETCH_IMAGES", "maybe"),
        ])
        .unwrap();

        assert_eq!(config.store_kind, StoreKind::Sqlite);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(!config.prefetch_images);
    }

    #[test]
    fn test_invalid_feed_url_is_an_error() {
        let err = config_from(&[("FEED_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, FeedClientError::Config(msg) if msg.contains("FEED_URL")));
    }
}
