//! Feed domain and cache orchestration
//!
//! Defines the feed model, the loader and cache capabilities every backend
//! speaks, the cancellable task model, and the local (cache-backed) loaders
//! that sit on top of a [`cache::FeedStore`] / [`cache::FeedImageDataStore`].
//!
//! Everything here is callback driven: operations take a [`Completion`] and
//! return immediately, delivering their result exactly once later on.

pub mod cache;
pub mod error;
pub mod feature;
pub mod in_flight;
pub mod liveness;
pub mod task;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{
    CachedFeed, DeletionResult, FeedImageDataStore, FeedStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedImageDataLoader, LocalFeedItem,
    LocalFeedLoader, RetrievalResult, StoreQueue,
};
pub use error::{FeedError, FeedImageDataError, StoreError};
pub use feature::{
    FeedCache, FeedImageDataCache, FeedImageDataLoader, FeedImageDataResult, FeedItem,
    FeedLoader, FeedResult,
};
pub use in_flight::InFlight;
pub use liveness::{Liveness, LivenessToken};
pub use task::{Cancellable, Completion, CompletionTask, Task};
