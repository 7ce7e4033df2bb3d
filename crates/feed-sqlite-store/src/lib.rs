//! SQLite-backed feed store
//!
//! The cached feed lives in a single-row header table plus an ordered item
//! table; image payloads are keyed by URL. Schema changes ship as versioned
//! migrations applied on open.

mod error;
pub mod feed;
pub mod images;
mod store;
pub mod types;

pub use error::{Result, SqliteStoreError};
pub use sqlx::sqlite::SqlitePool;
pub use store::SqliteFeedStore;
