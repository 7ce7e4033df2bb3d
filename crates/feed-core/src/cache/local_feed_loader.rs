//! Feed loader backed by the local store

use crate::cache::policy;
use crate::cache::store::{FeedStore, LocalFeedItem};
use crate::error::FeedError;
use crate::feature::{FeedCache, FeedItem, FeedLoader, FeedResult};
use crate::liveness::Liveness;
use crate::task::{Completion, CompletionTask, Task};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

type CurrentTime = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Loads, saves and expires the cached feed.
///
/// Staleness is decided here, not in the store: a stale or missing snapshot
/// loads as an empty feed, never as an error.
pub struct LocalFeedLoader<S: ?Sized> {
    store: Arc<S>,
    current_time: CurrentTime,
    liveness: Liveness,
}

impl<S: FeedStore + ?Sized + 'static> LocalFeedLoader<S> {
    pub fn new(
        store: Arc<S>,
        current_time: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            current_time: Arc::new(current_time),
            liveness: Liveness::new(),
        }
    }

    /// Drop the cached snapshot if it cannot be read or has expired.
    ///
    /// The deletion's result is not reported to anyone.
    pub fn validate_cache(&self) {
        let store = Arc::clone(&self.store);
        let current_time = Arc::clone(&self.current_time);
        let token = self.liveness.token();

        self.store.retrieve(Box::new(move |result| {
            if !token.is_alive() {
                return;
            }
            let reason = match result {
                Err(error) => {
                    warn!(%error, "Cached feed unreadable, deleting");
                    "unreadable"
                }
                Ok(Some(cache)) if !policy::validate_timestamp(cache.timestamp, current_time()) => {
                    debug!(timestamp = %cache.timestamp, "Cached feed expired, deleting");
                    "expired"
                }
                Ok(_) => return,
            };
            store.delete_cached_feed(Box::new(move |result| {
                if let Err(error) = result {
                    warn!(%error, reason, "Discarding failed cache deletion");
                }
            }));
        }));
    }
}

impl<S: FeedStore + ?Sized + 'static> FeedLoader for LocalFeedLoader<S> {
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        let task = CompletionTask::new(completion);
        let current_time = Arc::clone(&self.current_time);
        let token = self.liveness.token();
        let delivery = Arc::clone(&task);

        self.store.retrieve(Box::new(move |result| {
            if !token.is_alive() {
                return;
            }
            let feed = match result {
                Err(error) => Err(FeedError::Store(error)),
                Ok(Some(cache)) if policy::validate_timestamp(cache.timestamp, current_time()) => {
                    Ok(cache.feed.into_iter().map(FeedItem::from).collect())
                }
                Ok(Some(cache)) => {
                    debug!(timestamp = %cache.timestamp, "Cached feed expired, loading empty");
                    Ok(Vec::new())
                }
                Ok(None) => Ok(Vec::new()),
            };
            delivery.complete(feed);
        }));

        task.into()
    }
}

impl<S: FeedStore + ?Sized + 'static> FeedCache for LocalFeedLoader<S> {
    /// Replace the cached snapshot: delete, then insert stamped with "now".
    /// A failed delete is reported and nothing is inserted.
    fn save(&self, feed: Vec<FeedItem>, completion: Completion<Result<(), FeedError>>) {
        let store = Arc::clone(&self.store);
        let current_time = Arc::clone(&self.current_time);
        let token = self.liveness.token();

        self.store.delete_cached_feed(Box::new(move |result| {
            if !token.is_alive() {
                return;
            }
            if let Err(error) = result {
                completion(Err(FeedError::Store(error)));
                return;
            }
            let local = feed.iter().map(LocalFeedItem::from).collect();
            store.insert(
                local,
                current_time(),
                Box::new(move |result| {
                    if !token.is_alive() {
                        return;
                    }
                    completion(result.map_err(FeedError::Store));
                }),
            );
        }));
    }
}
