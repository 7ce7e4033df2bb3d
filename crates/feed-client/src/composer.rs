//! Composition root: wires remote and local loaders into the app pipelines

use crate::composite::{FeedImageDataLoaderWithFallbackComposite, FeedLoaderWithFallbackComposite};
use crate::decorator::{FeedImageDataLoaderCacheDecorator, FeedLoaderCacheDecorator};
use crate::dispatch::{DispatchContext, MainQueueDispatchDecorator};
use chrono::{DateTime, Utc};
use feed_api::{HttpClient, RemoteFeedImageDataLoader, RemoteFeedLoader};
use feed_core::{
    FeedImageDataLoader, FeedImageDataStore, FeedLoader, FeedStore, LocalFeedImageDataLoader,
    LocalFeedLoader,
};
use std::sync::Arc;
use url::Url;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The loaders the application talks to
pub struct FeedPipelines<S> {
    /// Remote first (caching what it gets), cache when offline
    pub feed_loader: Arc<dyn FeedLoader>,
    /// Cache first, remote (caching what it gets) on a miss
    pub image_loader: Arc<dyn FeedImageDataLoader>,
    local_feed_loader: Arc<LocalFeedLoader<S>>,
}

impl<S: FeedStore + 'static> FeedPipelines<S> {
    /// Drop an expired or unreadable cache; run before the app goes idle
    pub fn validate_cache(&self) {
        self.local_feed_loader.validate_cache();
    }
}

pub struct FeedComposer {
    feed_url: Url,
    clock: Clock,
}

impl FeedComposer {
    pub fn new(feed_url: Url) -> Self {
        Self {
            feed_url,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to stamp and validate the cache
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn compose<S, C, D>(&self, store: Arc<S>, client: Arc<C>, context: Arc<D>) -> FeedPipelines<S>
    where
        S: FeedStore + FeedImageDataStore + 'static,
        C: HttpClient + ?Sized + 'static,
        D: DispatchContext + ?Sized + 'static,
    {
        let clock = Arc::clone(&self.clock);
        let local_feed_loader = Arc::new(LocalFeedLoader::new(Arc::clone(&store), move || clock()));
        let local_image_loader = Arc::new(LocalFeedImageDataLoader::new(store));
        let remote_feed_loader = Arc::new(RemoteFeedLoader::new(
            self.feed_url.clone(),
            Arc::clone(&client),
        ));
        let remote_image_loader = Arc::new(RemoteFeedImageDataLoader::new(client));

        let feed_loader = FeedLoaderWithFallbackComposite::new(
            Arc::new(FeedLoaderCacheDecorator::new(
                remote_feed_loader,
                Arc::clone(&local_feed_loader),
            )),
            Arc::clone(&local_feed_loader),
        );
        let image_loader = FeedImageDataLoaderWithFallbackComposite::new(
            Arc::clone(&local_image_loader),
            Arc::new(FeedImageDataLoaderCacheDecorator::new(
                remote_image_loader,
                local_image_loader,
            )),
        );

        FeedPipelines {
            feed_loader: Arc::new(MainQueueDispatchDecorator::new(
                Arc::new(feed_loader),
                Arc::clone(&context),
            )),
            image_loader: Arc::new(MainQueueDispatchDecorator::new(
                Arc::new(image_loader),
                context,
            )),
            local_feed_loader,
        }
    }
}
