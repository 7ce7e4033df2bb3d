//! Decodes the feed endpoint's response body

use crate::http_client::HttpResponse;
use feed_core::{FeedError, FeedItem, FeedResult};
use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct Root {
    items: Vec<RemoteFeedItem>,
}

#[derive(Debug, Deserialize)]
struct RemoteFeedItem {
    id: Uuid,
    description: Option<String>,
    location: Option<String>,
    image: Url,
}

impl From<RemoteFeedItem> for FeedItem {
    fn from(item: RemoteFeedItem) -> Self {
        FeedItem::new(item.id, item.description, item.location, item.image)
    }
}

/// Only a 200 response carrying a well-formed `items` list is a feed
pub(crate) fn map(data: &[u8], response: &HttpResponse) -> FeedResult {
    if response.status != 200 {
        debug!(status = response.status, url = %response.url, "Unexpected feed status");
        return Err(FeedError::InvalidData);
    }
    let root: Root = serde_json::from_slice(data).map_err(|e| {
        debug!(error = %e, url = %response.url, "Undecodable feed body");
        FeedError::InvalidData
    })?;
    Ok(root.items.into_iter().map(FeedItem::from).collect())
}
