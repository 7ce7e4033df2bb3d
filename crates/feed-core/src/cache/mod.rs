//! Local cache: freshness policy, store contracts and the loaders built on them

mod local_feed_loader;
mod local_image_data_loader;
pub mod policy;
mod queue;
mod store;

pub use local_feed_loader::LocalFeedLoader;
pub use local_image_data_loader::LocalFeedImageDataLoader;
pub use queue::StoreQueue;
pub use store::{
    CachedFeed, DeletionResult, FeedImageDataStore, FeedStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedItem, RetrievalResult,
};
