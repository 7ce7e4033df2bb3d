//! Feed loader backed by the feed API

use crate::feed_items_mapper;
use crate::http_client::HttpClient;
use feed_core::{Completion, CompletionTask, FeedError, FeedLoader, FeedResult, Liveness, Task};
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct RemoteFeedLoader<C: ?Sized> {
    url: Url,
    client: Arc<C>,
    liveness: Liveness,
}

impl<C: HttpClient + ?Sized + 'static> RemoteFeedLoader<C> {
    pub fn new(url: Url, client: Arc<C>) -> Self {
        Self {
            url,
            client,
            liveness: Liveness::new(),
        }
    }
}

impl<C: HttpClient + ?Sized + 'static> FeedLoader for RemoteFeedLoader<C> {
    fn load_feed(&self, completion: Completion<FeedResult>) -> Task {
        let task = CompletionTask::new(completion);
        let delivery = Arc::clone(&task);
        let token = self.liveness.token();

        let request = self.client.get(
            &self.url,
            Box::new(move |result| {
                if !token.is_alive() {
                    return;
                }
                let feed = match result {
                    Ok((data, response)) => feed_items_mapper::map(&data, &response),
                    Err(error) => {
                        debug!(%error, "Feed request failed");
                        Err(FeedError::Connectivity)
                    }
                };
                delivery.complete(feed);
            }),
        );

        task.wrap(request);
        task.into()
    }
}
