//! Feed API client
//!
//! Fetches the feed and image payloads over HTTP. The transport sits behind
//! the [`HttpClient`] trait; [`ReqwestHttpClient`] is the production
//! implementation.

pub mod error;
mod feed_items_mapper;
pub mod http_client;
mod remote_feed_loader;
mod remote_image_data_loader;
#[cfg(test)]
mod test_support;

pub use error::{FeedApiError, Result};
pub use http_client::{HttpClient, HttpClientResult, HttpResponse, ReqwestHttpClient};
pub use remote_feed_loader::RemoteFeedLoader;
pub use remote_image_data_loader::RemoteFeedImageDataLoader;
