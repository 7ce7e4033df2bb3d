//! Feed client composition
//!
//! Combinators that turn the remote and local loaders into the pipelines the
//! application uses: fallback from one loader to another, caching of
//! successful remote loads, and delivery of every result on the main
//! context.

pub mod composer;
pub mod composite;
pub mod config;
pub mod decorator;
pub mod dispatch;
pub mod error;
#[cfg(test)]
mod test_support;

pub use composer::{FeedComposer, FeedPipelines};
pub use composite::{FeedImageDataLoaderWithFallbackComposite, FeedLoaderWithFallbackComposite};
pub use config::{Config, StoreKind};
pub use decorator::{FeedImageDataLoaderCacheDecorator, FeedLoaderCacheDecorator};
pub use dispatch::{main_queue, DispatchContext, MainLoop, MainQueue, MainQueueDispatchDecorator};
pub use error::{FeedClientError, Result};
