//! Primary/fallback composition
//!
//! The primary loader runs first. Its success is delivered as is; its failure
//! starts the fallback, whose result (success or failure) is delivered
//! verbatim. Cancelling the returned task cancels whichever load is
//! outstanding, and a cancelled composite never starts the fallback. Once a
//! composite is dropped its pending loads neither fall back nor deliver.

use feed_core::{
    Completion, CompletionTask, FeedImageDataLoader, FeedImageDataResult, FeedLoader, FeedResult,
    Liveness, Task,
};
use std::sync::Arc;
use tracing::info;
use url::Url;

pub struct FeedLoaderWithFallbackComposite<P: ?Sized, F: ?Sized> {
    primary: Arc<P>,
    fallback: Arc<F>,
    liveness: Liveness,
}

impl<P, F> FeedLoaderWithFallbackComposite<P, F>
where
    P: FeedLoader + ?Sized,
    F: FeedLoader + ?Sized + 'static,
{
    pub fn new(primary: Arc<P>, fallback: Arc<F>) -> Self {
        Self {
            primary,
            fallback,
            liveness: Liveness::new(),
        }
    }
}

impl<P, F> FeedLoader for FeedLoaderWithFallbackComposite<P, F>
where
    P: FeedLoader + ?Sized,
    F: FeedLoader + ?Sized + 'static,
{
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        let task = CompletionTask::new(completion);
        let delivery = Arc::clone(&task);
        let fallback = Arc::clone(&self.fallback);
        let token = self.liveness.token();

        let primary = self.primary.load_feed(Box::new(move |result| {
            if !token.is_alive() {
                return;
            }
            match result {
                Ok(feed) => delivery.complete(Ok(feed)),
                Err(error) => {
                    if delivery.is_cancelled() {
                        return;
                    }
                    info!(%error, "Primary feed load failed, falling back");
                    let inner = Arc::clone(&delivery);
                    let fallback = fallback.load_feed(Box::new(move |result| {
                        if token.is_alive() {
                            inner.complete(result);
                        }
                    }));
                    delivery.wrap(fallback);
                }
            }
        }));

        task.wrap_initial(primary);
        task.into()
    }
}

pub struct FeedImageDataLoaderWithFallbackComposite<P: ?Sized, F: ?Sized> {
    primary: Arc<P>,
    fallback: Arc<F>,
    liveness: Liveness,
}

impl<P, F> FeedImageDataLoaderWithFallbackComposite<P, F>
where
    P: FeedImageDataLoader + ?Sized,
    F: FeedImageDataLoader + ?Sized + 'static,
{
    pub fn new(primary: Arc<P>, fallback: Arc<F>) -> Self {
        Self {
            primary,
            fallback,
            liveness: Liveness::new(),
        }
    }
}

impl<P, F> FeedImageDataLoader for FeedImageDataLoaderWithFallbackComposite<P, F>
where
    P: FeedImageDataLoader + ?Sized,
    F: FeedImageDataLoader + ?Sized + 'static,
{
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        let task = CompletionTask::new(completion);
        let delivery = Arc::clone(&task);
        let fallback = Arc::clone(&self.fallback);
        let requested = url.clone();
        let token = self.liveness.token();

        let primary = self.primary.load_image_data(
            url,
            Box::new(move |result| {
                if !token.is_alive() {
                    return;
                }
                match result {
                    Ok(data) => delivery.complete(Ok(data)),
                    Err(error) => {
                        if delivery.is_cancelled() {
                            return;
                        }
                        info!(url = %requested, %error, "Primary image load failed, falling back");
                        let inner = Arc::clone(&delivery);
                        let fallback = fallback.load_image_data(
                            &requested,
                            Box::new(move |result| {
                                if token.is_alive() {
                                    inner.complete(result);
                                }
                            }),
                        );
                        delivery.wrap(fallback);
                    }
                }
            }),
        );

        task.wrap_initial(primary);
        task.into()
    }
}
