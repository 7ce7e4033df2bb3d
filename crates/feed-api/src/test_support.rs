use crate::error::FeedApiError;
use crate::http_client::{HttpClient, HttpClientResult, HttpResponse};
use feed_core::{Cancellable, Completion, Task};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use url::Url;

/// Records requests and holds their completions until the test settles them
#[derive(Default)]
pub struct HttpClientSpy {
    requests: Mutex<Vec<Url>>,
    pending: Mutex<VecDeque<Completion<HttpClientResult>>>,
    cancelled: Arc<Mutex<Vec<Url>>>,
}

struct RequestSpy {
    url: Url,
    cancelled: Arc<Mutex<Vec<Url>>>,
}

impl Cancellable for RequestSpy {
    fn cancel(&self) {
        self.cancelled.lock().push(self.url.clone());
    }
}

impl HttpClientSpy {
    pub fn requested_urls(&self) -> Vec<Url> {
        self.requests.lock().clone()
    }

    pub fn cancelled_urls(&self) -> Vec<Url> {
        self.cancelled.lock().clone()
    }

    /// Settle the oldest outstanding request
    pub fn complete(&self, result: HttpClientResult) {
        let completion = self.pending.lock().pop_front().expect("no pending request");
        completion(result);
    }
}

impl HttpClient for HttpClientSpy {
    fn get(&self, url: &Url, completion: Completion<HttpClientResult>) -> Task {
        self.requests.lock().push(url.clone());
        self.pending.lock().push_back(completion);
        Task::new(RequestSpy {
            url: url.clone(),
            cancelled: Arc::clone(&self.cancelled),
        })
    }
}

pub fn ok_response(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        url: Url::parse("https://any-url.example.com").unwrap(),
    }
}

pub fn any_error() -> FeedApiError {
    let error = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("an unparsable URL fails to build");
    FeedApiError::Http(error)
}
