//! Store contracts every persistence backend implements
//!
//! Implementations must:
//! - deliver each completion exactly once, never before the call returns
//! - run side effects (delete, insert) one at a time in submission order
//! - hold at most one [`CachedFeed`]; an insert replaces it wholesale
//! - leave expiry to the caller

use crate::error::StoreError;
use crate::feature::FeedItem;
use crate::task::Completion;
use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

/// Feed item as the store sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFeedItem {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Url,
}

impl From<&FeedItem> for LocalFeedItem {
    fn from(item: &FeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description.clone(),
            location: item.location.clone(),
            image_url: item.image_url.clone(),
        }
    }
}

impl From<LocalFeedItem> for FeedItem {
    fn from(local: LocalFeedItem) -> Self {
        FeedItem::new(local.id, local.description, local.location, local.image_url)
    }
}

/// The single persisted feed snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedItem>,
    pub timestamp: DateTime<Utc>,
}

pub type DeletionResult = Result<(), StoreError>;
pub type InsertionResult = Result<(), StoreError>;
/// `Ok(None)` means the store is empty
pub type RetrievalResult = Result<Option<CachedFeed>, StoreError>;

pub trait FeedStore: Send + Sync {
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>);
    fn insert(
        &self,
        feed: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    );
    fn retrieve(&self, completion: Completion<RetrievalResult>);
}

pub type ImageInsertionResult = Result<(), StoreError>;
/// `Ok(None)` means nothing is stored for the URL
pub type ImageRetrievalResult = Result<Option<Vec<u8>>, StoreError>;

pub trait FeedImageDataStore: Send + Sync {
    fn insert(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>);
    fn retrieve(&self, url: &Url, completion: Completion<ImageRetrievalResult>);
}
