use crate::error::Result;
use crate::{feed, images};
use chrono::{DateTime, Utc};
use feed_core::{
    Completion, DeletionResult, FeedImageDataStore, FeedStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedItem, RetrievalResult, StoreQueue,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use url::Url;

/// Feed and image store backed by a SQLite database
pub struct SqliteFeedStore {
    pool: SqlitePool,
    queue: StoreQueue,
}

impl SqliteFeedStore {
    /// Open (creating it and its directory if missing) the database at
    /// `path` and migrate it
    pub async fn open(path: impl AsRef<Path>, runtime: &Handle) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        info!(path = ?path.as_ref(), "Opened feed store database");
        Self::with_pool(pool, runtime).await
    }

    /// Private in-memory database; lost when the store is dropped
    pub async fn in_memory(runtime: &Handle) -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);
        // every connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool, runtime).await
    }

    pub async fn with_pool(pool: SqlitePool, runtime: &Handle) -> Result<Self> {
        run_migrations(&pool).await?;
        Ok(Self {
            pool,
            queue: StoreQueue::new("sqlite-store", runtime),
        })
    }

    /// Wait for every submitted operation to finish
    pub async fn flush(&self) {
        self.queue.wait_idle().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Apply pending schema migrations; already applied versions are skipped
async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!().run(pool).await?;
    debug!("Feed store schema up to date");
    Ok(())
}

impl FeedStore for SqliteFeedStore {
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>) {
        let pool = self.pool.clone();
        self.queue.write("delete_cached_feed", async move {
            let result = feed::delete(&pool).await;
            if let Err(e) = &result {
                warn!(error = %e, "Failed to delete cached feed");
            }
            completion(result.map_err(Into::into));
        });
    }

    fn insert(
        &self,
        items: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    ) {
        let pool = self.pool.clone();
        self.queue.write("insert", async move {
            let result = feed::replace(&pool, &items, timestamp).await;
            match &result {
                Ok(()) => debug!(items = items.len(), %timestamp, "Cached feed"),
                Err(e) => warn!(error = %e, "Failed to cache feed"),
            }
            completion(result.map_err(Into::into));
        });
    }

    fn retrieve(&self, completion: Completion<RetrievalResult>) {
        let pool = self.pool.clone();
        self.queue.read("retrieve", async move {
            let result = feed::find(&pool).await;
            if let Err(e) = &result {
                warn!(error = %e, "Failed to read cached feed");
            }
            completion(result.map_err(Into::into));
        });
    }
}

impl FeedImageDataStore for SqliteFeedStore {
    fn insert(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>) {
        let pool = self.pool.clone();
        let url = url.clone();
        self.queue.write("insert_image", async move {
            let result = images::upsert(&pool, &url, &data).await;
            match &result {
                Ok(()) => debug!(url = %url, size = data.len(), "Cached image data"),
                Err(e) => warn!(url = %url, error = %e, "Failed to cache image data"),
            }
            completion(result.map_err(Into::into));
        });
    }

    fn retrieve(&self, url: &Url, completion: Completion<ImageRetrievalResult>) {
        let pool = self.pool.clone();
        let url = url.clone();
        self.queue.read("retrieve_image", async move {
            let result = images::find(&pool, &url).await;
            completion(result.map_err(Into::into));
        });
    }
}
