//! Write-through caching of successful loads

use feed_core::{
    Completion, FeedCache, FeedImageDataCache, FeedImageDataLoader, FeedImageDataResult,
    FeedLoader, FeedResult, Liveness, Task,
};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Saves every successfully loaded feed into `cache`
///
/// The caller gets the feed first; the save is best effort and its outcome
/// is only logged. Loads finishing after the decorator is dropped are
/// neither delivered nor saved.
pub struct FeedLoaderCacheDecorator<L: ?Sized, C: ?Sized> {
    decoratee: Arc<L>,
    cache: Arc<C>,
    liveness: Liveness,
}

impl<L, C> FeedLoaderCacheDecorator<L, C>
where
    L: FeedLoader + ?Sized,
    C: FeedCache + ?Sized + 'static,
{
    pub fn new(decoratee: Arc<L>, cache: Arc<C>) -> Self {
        Self {
            decoratee,
            cache,
            liveness: Liveness::new(),
        }
    }
}

impl<L, C> FeedLoader for FeedLoaderCacheDecorator<L, C>
where
    L: FeedLoader + ?Sized,
    C: FeedCache + ?Sized + 'static,
{
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        let cache = Arc::clone(&self.cache);
        let token = self.liveness.token();
        self.decoratee.load_feed(Box::new(move |result| {
            if !token.is_alive() {
                return;
            }
            let loaded = result.as_ref().ok().cloned();
            completion(result);
            if let Some(feed) = loaded {
                cache.save(
                    feed,
                    Box::new(|outcome| {
                        if let Err(error) = outcome {
                            debug!(%error, "Ignoring failed feed cache save");
                        }
                    }),
                );
            }
        }))
    }
}

/// Saves every successfully loaded image payload into `cache`
pub struct FeedImageDataLoaderCacheDecorator<L: ?Sized, C: ?Sized> {
    decoratee: Arc<L>,
    cache: Arc<C>,
    liveness: Liveness,
}

impl<L, C> FeedImageDataLoaderCacheDecorator<L, C>
where
    L: FeedImageDataLoader + ?Sized,
    C: FeedImageDataCache + ?Sized + 'static,
{
    pub fn new(decoratee: Arc<L>, cache: Arc<C>) -> Self {
        Self {
            decoratee,
            cache,
            liveness: Liveness::new(),
        }
    }
}

impl<L, C> FeedImageDataLoader for FeedImageDataLoaderCacheDecorator<L, C>
where
    L: FeedImageDataLoader + ?Sized,
    C: FeedImageDataCache + ?Sized + 'static,
{
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        let cache = Arc::clone(&self.cache);
        let requested = url.clone();
        let token = self.liveness.token();
        self.decoratee.load_image_data(
            url,
            Box::new(move |result| {
                if !token.is_alive() {
                    return;
                }
                let loaded = result.as_ref().ok().cloned();
                completion(result);
                if let Some(data) = loaded {
                    cache.save(
                        data,
                        &requested,
                        Box::new(move |outcome| {
                            if let Err(error) = outcome {
                                debug!(%error, "Ignoring failed image cache save");
                            }
                        }),
                    );
                }
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        sink, FeedCacheSpy, FeedImageDataCacheSpy, FeedImageDataLoaderSpy, FeedLoaderSpy,
    };
    use feed_core::testing::{any_data, any_url, unique_feed};
    use feed_core::{FeedError, FeedImageDataError};
    use parking_lot::Mutex;

    fn make_feed_sut() -> (
        FeedLoaderCacheDecorator<FeedLoaderSpy, FeedCacheSpy>,
        Arc<FeedLoaderSpy>,
        Arc<FeedCacheSpy>,
    ) {
        let loader = Arc::new(FeedLoaderSpy::default());
        let cache = Arc::new(FeedCacheSpy::default());
        let sut = FeedLoaderCacheDecorator::new(Arc::clone(&loader), Arc::clone(&cache));
        (sut, loader, cache)
    }

    fn make_image_sut() -> (
        FeedImageDataLoaderCacheDecorator<FeedImageDataLoaderSpy, FeedImageDataCacheSpy>,
        Arc<FeedImageDataLoaderSpy>,
        Arc<FeedImageDataCacheSpy>,
    ) {
        let loader = Arc::new(FeedImageDataLoaderSpy::default());
        let cache = Arc::new(FeedImageDataCacheSpy::default());
        let sut = FeedImageDataLoaderCacheDecorator::new(Arc::clone(&loader), Arc::clone(&cache));
        (sut, loader, cache)
    }

    #[test]
    fn test_feed_load_delivers_decoratee_result() {
        let (sut, loader, _cache) = make_feed_sut();
        let (completion, received) = sink();
        let feed = unique_feed();

        let _task = sut.load_feed(completion);
        loader.complete(Ok(feed.clone()));

        assert!(matches!(received.lock().as_slice(), [Ok(items)] if *items == feed));
    }

    #[test]
    fn test_feed_load_caches_loaded_feed_once_on_success() {
        let (sut, loader, cache) = make_feed_sut();
        let (completion, _received) = sink();
        let feed = unique_feed();

        let _task = sut.load_feed(completion);
        loader.complete(Ok(feed.clone()));

        assert_eq!(cache.saved(), vec![feed]);
    }

    #[test]
    fn test_feed_load_does_not_cache_on_failure() {
        let (sut, loader, cache) = make_feed_sut();
        let (completion, received) = sink();

        let _task = sut.load_feed(completion);
        loader.complete(Err(FeedError::Connectivity));

        assert!(cache.saved().is_empty());
        assert!(matches!(received.lock().as_slice(), [Err(FeedError::Connectivity)]));
    }

    #[test]
    fn test_feed_load_delivers_before_saving() {
        let loader = Arc::new(FeedLoaderSpy::default());
        let cache = Arc::new(FeedCacheSpy::default());
        let sut = FeedLoaderCacheDecorator::new(Arc::clone(&loader), Arc::clone(&cache));
        let saves_at_delivery = Arc::new(Mutex::new(None));

        let observed = Arc::clone(&saves_at_delivery);
        let observed_cache = Arc::clone(&cache);
        let _task = sut.load_feed(Box::new(move |_| {
            *observed.lock() = Some(observed_cache.saved().len());
        }));
        loader.complete(Ok(unique_feed()));

        assert_eq!(*saves_at_delivery.lock(), Some(0));
        assert_eq!(cache.saved().len(), 1);
    }

    #[test]
    fn test_feed_cancel_forwards_to_decoratee() {
        let (sut, loader, _cache) = make_feed_sut();
        let (completion, _received) = sink::<FeedResult>();

        sut.load_feed(completion).cancel();

        assert_eq!(loader.cancels.count(), 1);
    }

    #[test]
    fn test_image_load_delivers_decoratee_result() {
        let (sut, loader, _cache) = make_image_sut();
        let (completion, received) = sink();

        let _task = sut.load_image_data(&any_url(), completion);
        loader.complete(Err(FeedImageDataError::NotFound));

        assert_eq!(*received.lock(), vec![Err(FeedImageDataError::NotFound)]);
    }

    #[test]
    fn test_image_load_caches_data_for_url_on_success() {
        let (sut, loader, cache) = make_image_sut();
        let (completion, received) = sink();

        let _task = sut.load_image_data(&any_url(), completion);
        loader.complete(Ok(any_data()));

        assert_eq!(*received.lock(), vec![Ok(any_data())]);
        assert_eq!(cache.saved(), vec![(any_data(), any_url())]);
    }

    #[test]
    fn test_image_load_does_not_cache_on_failure() {
        let (sut, loader, cache) = make_image_sut();
        let (completion, _received) = sink();

        let _task = sut.load_image_data(&any_url(), completion);
        loader.complete(Err(FeedImageDataError::Connectivity));

        assert!(cache.saved().is_empty());
    }

    #[test]
    fn test_image_cancel_forwards_to_decoratee() {
        let (sut, loader, _cache) = make_image_sut();
        let (completion, _received) = sink::<FeedImageDataResult>();

        sut.load_image_data(&any_url(), completion).cancel();

        assert_eq!(loader.cancels.count(), 1);
    }

    #[test]
    fn test_feed_load_neither_delivers_nor_saves_after_decorator_dropped() {
        let (sut, loader, cache) = make_feed_sut();
        let (completion, received) = sink();

        let _task = sut.load_feed(completion);
        drop(sut);
        loader.complete(Ok(unique_feed()));

        assert!(received.lock().is_empty());
        assert!(cache.saved().is_empty());
    }

    #[test]
    fn test_image_load_neither_delivers_nor_saves_after_decorator_dropped() {
        let (sut, loader, cache) = make_image_sut();
        let (completion, received) = sink();

        let _task = sut.load_image_data(&any_url(), completion);
        drop(sut);
        loader.complete(Ok(any_data()));

        assert!(received.lock().is_empty());
        assert!(cache.saved().is_empty());
    }
}
