//! Feed model and the capabilities loaders and caches expose

use crate::error::{FeedError, FeedImageDataError};
use crate::task::{Completion, Task};
use std::sync::Arc;
use url::Url;
use uuid::Uuid;

/// One entry of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Url,
}

impl FeedItem {
    pub fn new(
        id: Uuid,
        description: Option<String>,
        location: Option<String>,
        image_url: Url,
    ) -> Self {
        Self {
            id,
            description,
            location,
            image_url,
        }
    }
}

pub type FeedResult = Result<Vec<FeedItem>, FeedError>;
pub type FeedImageDataResult = Result<Vec<u8>, FeedImageDataError>;

/// Loads the whole feed
pub trait FeedLoader: Send + Sync {
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task;
}

/// Loads the image bytes behind a feed item's image URL
pub trait FeedImageDataLoader: Send + Sync {
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task;
}

/// Sink that persists a feed snapshot
pub trait FeedCache: Send + Sync {
    fn save(&self, feed: Vec<FeedItem>, completion: Completion<Result<(), FeedError>>);
}

/// Sink that persists image bytes for a URL
pub trait FeedImageDataCache: Send + Sync {
    fn save(
        &self,
        data: Vec<u8>,
        url: &Url,
        completion: Completion<Result<(), FeedImageDataError>>,
    );
}

impl<T: FeedLoader + ?Sized> FeedLoader for Arc<T> {
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        (**self).load_feed(completion)
    }
}

impl<T: FeedImageDataLoader + ?Sized> FeedImageDataLoader for Arc<T> {
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        (**self).load_image_data(url, completion)
    }
}

impl<T: FeedCache + ?Sized> FeedCache for Arc<T> {
    fn save(&self, feed: Vec<FeedItem>, completion: Completion<Result<(), FeedError>>) {
        (**self).save(feed, completion)
    }
}

impl<T: FeedImageDataCache + ?Sized> FeedImageDataCache for Arc<T> {
    fn save(
        &self,
        data: Vec<u8>,
        url: &Url,
        completion: Completion<Result<(), FeedImageDataError>>,
    ) {
        (**self).save(data, url, completion)
    }
}
