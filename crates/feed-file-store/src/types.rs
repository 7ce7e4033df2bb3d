//! On-disk snapshot format

use chrono::{DateTime, Utc};
use feed_core::{CachedFeed, LocalFeedItem};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FeedSnapshot {
    pub items: Vec<SnapshotItem>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SnapshotItem {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub image_url: Url,
}

impl FeedSnapshot {
    pub fn new(feed: Vec<LocalFeedItem>, timestamp: DateTime<Utc>) -> Self {
        Self {
            items: feed.into_iter().map(SnapshotItem::from).collect(),
            timestamp,
        }
    }
}

impl From<LocalFeedItem> for SnapshotItem {
    fn from(item: LocalFeedItem) -> Self {
        Self {
            id: item.id,
            description: item.description,
            location: item.location,
            image_url: item.image_url,
        }
    }
}

impl From<FeedSnapshot> for CachedFeed {
    fn from(snapshot: FeedSnapshot) -> Self {
        CachedFeed {
            feed: snapshot
                .items
                .into_iter()
                .map(|item| LocalFeedItem {
                    id: item.id,
                    description: item.description,
                    location: item.location,
                    image_url: item.image_url,
                })
                .collect(),
            timestamp: snapshot.timestamp,
        }
    }
}
