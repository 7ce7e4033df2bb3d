//! HTTP transport

use crate::error::Result;
use feed_core::{Completion, CompletionTask, InFlight, Task};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use url::Url;

/// Status line of a completed response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Final URL after redirects
    pub url: Url,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Body and status of a response, or the transport failure
pub type HttpClientResult = Result<(Vec<u8>, HttpResponse)>;

pub trait HttpClient: Send + Sync {
    /// GET `url`; any status counts as a response, only transport failures
    /// are errors
    fn get(&self, url: &Url, completion: Completion<HttpClientResult>) -> Task;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn get(&self, url: &Url, completion: Completion<HttpClientResult>) -> Task {
        (**self).get(url, completion)
    }
}

/// [`HttpClient`] backed by `reqwest`, running requests on a tokio runtime
pub struct ReqwestHttpClient {
    http: reqwest::Client,
    runtime: Handle,
    in_flight: Arc<InFlight>,
}

impl ReqwestHttpClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client with the default timeout (30 seconds)
    pub fn new(runtime: Handle) -> Result<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT, runtime)
    }

    pub fn with_timeout(timeout: Duration, runtime: Handle) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            runtime,
            in_flight: Arc::new(InFlight::new()),
        })
    }

    /// Resolves once every request, completion callback included, has
    /// finished or been aborted
    pub async fn wait_idle(&self) {
        self.in_flight.wait_idle().await;
    }

    async fn fetch(http: &reqwest::Client, url: &Url) -> Result<(Vec<u8>, HttpResponse)> {
        let response = http.get(url.clone()).send().await?;
        let meta = HttpResponse {
            status: response.status().as_u16(),
            url: response.url().clone(),
        };
        let body = response.bytes().await?;
        Ok((body.to_vec(), meta))
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get(&self, url: &Url, completion: Completion<HttpClientResult>) -> Task {
        let task = CompletionTask::new(completion);
        let delivery = Arc::clone(&task);
        let http = self.http.clone();
        let url = url.clone();
        let in_flight = RequestGuard::begin(Arc::clone(&self.in_flight));

        let handle = self.runtime.spawn(async move {
            let _in_flight = in_flight;
            let result = Self::fetch(&http, &url).await;
            match &result {
                Ok((body, response)) => {
                    debug!(url = %url, status = response.status, size = body.len(), "GET completed")
                }
                Err(e) => warn!(url = %url, error = %e, "GET failed"),
            }
            delivery.complete(result);
        });

        task.wrap(Task::new(handle.abort_handle()));
        task.into()
    }
}

/// Counts a request as in flight until dropped, which also covers aborts
struct RequestGuard(Arc<InFlight>);

impl RequestGuard {
    fn begin(in_flight: Arc<InFlight>) -> Self {
        in_flight.begin();
        Self(in_flight)
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.0.finish();
    }
}
