use feed_core::{
    Cancellable, Completion, FeedCache, FeedError, FeedImageDataCache, FeedImageDataError,
    FeedImageDataLoader, FeedImageDataResult, FeedItem, FeedLoader, FeedResult, Task,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

#[derive(Default)]
pub struct CancelCounter(AtomicUsize);

impl CancelCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Cancellable for CancelCounter {
    fn cancel(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Feed loader whose loads stay pending until the test completes them
#[derive(Default)]
pub struct FeedLoaderSpy {
    pending: Mutex<VecDeque<Completion<FeedResult>>>,
    loads: AtomicUsize,
    pub cancels: Arc<CancelCounter>,
}

impl FeedLoaderSpy {
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn complete(&self, result: FeedResult) {
        let completion = self.pending.lock().pop_front().expect("no pending load");
        completion(result);
    }
}

impl FeedLoader for FeedLoaderSpy {
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().push_back(completion);
        Task::from(Arc::clone(&self.cancels))
    }
}

#[derive(Default)]
pub struct FeedImageDataLoaderSpy {
    pending: Mutex<VecDeque<Completion<FeedImageDataResult>>>,
    urls: Mutex<Vec<Url>>,
    pub cancels: Arc<CancelCounter>,
}

impl FeedImageDataLoaderSpy {
    pub fn loaded_urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }

    pub fn complete(&self, result: FeedImageDataResult) {
        let completion = self.pending.lock().pop_front().expect("no pending load");
        completion(result);
    }
}

impl FeedImageDataLoader for FeedImageDataLoaderSpy {
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        self.urls.lock().push(url.clone());
        self.pending.lock().push_back(completion);
        Task::from(Arc::clone(&self.cancels))
    }
}

/// Records saves and reports each one as failed
#[derive(Default)]
pub struct FeedCacheSpy {
    saved: Mutex<Vec<Vec<FeedItem>>>,
}

impl FeedCacheSpy {
    pub fn saved(&self) -> Vec<Vec<FeedItem>> {
        self.saved.lock().clone()
    }
}

impl FeedCache for FeedCacheSpy {
    fn save(&self, feed: Vec<FeedItem>, completion: Completion<Result<(), FeedError>>) {
        self.saved.lock().push(feed);
        completion(Err(FeedError::Store("cache unavailable".into())));
    }
}

#[derive(Default)]
pub struct FeedImageDataCacheSpy {
    saved: Mutex<Vec<(Vec<u8>, Url)>>,
}

impl FeedImageDataCacheSpy {
    pub fn saved(&self) -> Vec<(Vec<u8>, Url)> {
        self.saved.lock().clone()
    }
}

impl FeedImageDataCache for FeedImageDataCacheSpy {
    fn save(
        &self,
        data: Vec<u8>,
        url: &Url,
        completion: Completion<Result<(), FeedImageDataError>>,
    ) {
        self.saved.lock().push((data, url.clone()));
        completion(Err(FeedImageDataError::Failed));
    }
}

/// Collects delivered results
pub fn sink<T: Send + 'static>() -> (Completion<T>, Arc<Mutex<Vec<T>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    (Box::new(move |result| sink.lock().push(result)), received)
}
