//! Image data loader backed by plain GETs of the image URL

use crate::http_client::HttpClient;
use feed_core::{
    Completion, CompletionTask, FeedImageDataError, FeedImageDataLoader, FeedImageDataResult,
    Liveness, Task,
};
use std::sync::Arc;
use tracing::debug;
use url::Url;

pub struct RemoteFeedImageDataLoader<C: ?Sized> {
    client: Arc<C>,
    liveness: Liveness,
}

impl<C: HttpClient + ?Sized + 'static> RemoteFeedImageDataLoader<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            liveness: Liveness::new(),
        }
    }
}

impl<C: HttpClient + ?Sized + 'static> FeedImageDataLoader for RemoteFeedImageDataLoader<C> {
    /// A 2xx response with a non-empty body is image data; anything else
    /// that arrives is [`FeedImageDataError::InvalidData`].
    fn load_image_data(&self, url: &Url, completion: Completion<FeedImageDataResult>) -> Task {
        let task = CompletionTask::new(completion);
        let delivery = Arc::clone(&task);
        let token = self.liveness.token();
        let requested = url.clone();

        let request = self.client.get(
            url,
            Box::new(move |result| {
                if !token.is_alive() {
                    return;
                }
                let data = match result {
                    Ok((data, response)) if response.is_success() && !data.is_empty() => Ok(data),
                    Ok((data, response)) => {
                        debug!(url = %requested, status = response.status, size = data.len(), "Rejected image response");
                        Err(FeedImageDataError::InvalidData)
                    }
                    Err(error) => {
                        debug!(url = %requested, %error, "Image request failed");
                        Err(FeedImageDataError::Connectivity)
                    }
                };
                delivery.complete(data);
            }),
        );

        task.wrap(request);
        task.into()
    }
}
