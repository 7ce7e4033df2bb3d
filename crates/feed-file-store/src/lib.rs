//! File-backed feed store
//!
//! Holds the cached feed snapshot as a JSON document and image payloads as
//! one file per URL. Every write lands in a temporary sibling first and is
//! renamed into place, so readers only ever see whole files.

mod error;
mod store;
mod types;

pub use error::{FileStoreError, Result};
pub use store::FileFeedStore;
