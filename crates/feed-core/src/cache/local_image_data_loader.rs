//! Image data loader backed by the local store

use crate::cache::store::FeedImageDataStore;
use crate::error::FeedImageDataError;
use crate::feature::{FeedImageDataCache, FeedImageDataLoader, FeedImageDataResult};
use crate::liveness::Liveness;
use crate::task::{Completion, CompletionTask, Task};
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct LocalFeedImageDataLoader<S: ?Sized> {
    store: Arc<S>,
    liveness: Liveness,
}

impl<S: FeedImageDataStore + ?Sized + 'static> LocalFeedImageDataLoader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            liveness: Liveness::new(),
        }
    }
}

impl<S: FeedImageDataStore + ?Sized + 'static> FeedImageDataLoader for LocalFeedImageDataLoader<S> {
    /// Absent bytes and a failing store both load as
    /// [`FeedImageDataError::NotFound`].
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        let task = CompletionTask::new(completion);
        let token = self.liveness.token();
        let delivery = Arc::clone(&task);
        let requested = url.clone();

        self.store.retrieve(
            url,
            Box::new(move |result| {
                if !token.is_alive() {
                    return;
                }
                let data = match result {
                    Ok(Some(data)) => Ok(data),
                    Ok(None) => Err(FeedImageDataError::NotFound),
                    Err(error) => {
                        debug!(url = %requested, %error, "Image data retrieval failed");
                        Err(FeedImageDataError::NotFound)
                    }
                };
                delivery.complete(data);
            }),
        );

        task.into()
    }
}

impl<S: FeedImageDataStore + ?Sized + 'static> FeedImageDataCache for LocalFeedImageDataLoader<S> {
    fn save(
        &self,
        data: Vec<u8>,
        url: &Url,
        completion: Completion<Result<(), FeedImageDataError>>,
    ) {
        let token = self.liveness.token();
        self.store.insert(
            data,
            url,
            Box::new(move |result| {
                if !token.is_alive() {
                    return;
                }
                completion(result.map_err(|_| FeedImageDataError::Failed));
            }),
        );
    }
}
