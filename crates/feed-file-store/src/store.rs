//! Store implementation over a directory

use crate::error::Result;
use crate::types::FeedSnapshot;
use chrono::{DateTime, Utc};
use feed_core::{
    CachedFeed, Completion, DeletionResult, FeedImageDataStore, FeedStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedItem, RetrievalResult, StoreQueue,
};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use url::Url;

const FEED_FILE: &str = "feed.json";
const IMAGES_DIR: &str = "images";

/// Feed and image store rooted at a directory
///
/// The directory is created on first write. Operations run on the runtime
/// passed to [`FileFeedStore::new`].
pub struct FileFeedStore {
    root: PathBuf,
    queue: StoreQueue,
}

impl FileFeedStore {
    pub fn new(root: impl Into<PathBuf>, runtime: &Handle) -> Self {
        Self {
            root: root.into(),
            queue: StoreQueue::new("file-store", runtime),
        }
    }

    /// File name for an image URL
    pub fn image_key(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Wait for every submitted operation to finish
    pub async fn flush(&self) {
        self.queue.wait_idle().await;
    }

    fn feed_path(&self) -> PathBuf {
        self.root.join(FEED_FILE)
    }

    fn image_path(&self, url: &Url) -> PathBuf {
        self.root.join(IMAGES_DIR).join(Self::image_key(url))
    }
}

impl FeedStore for FileFeedStore {
    fn delete_cached_feed(&self, completion: Completion<DeletionResult>) {
        let path = self.feed_path();
        self.queue.write("delete_cached_feed", async move {
            let result = remove_if_present(&path).await;
            if let Err(e) = &result {
                warn!(path = ?path, error = %e, "Failed to delete feed snapshot");
            }
            completion(result.map_err(Into::into));
        });
    }

    fn insert(
        &self,
        feed: Vec<LocalFeedItem>,
        timestamp: DateTime<Utc>,
        completion: Completion<InsertionResult>,
    ) {
        let path = self.feed_path();
        self.queue.write("insert", async move {
            let count = feed.len();
            let result = write_snapshot(&path, FeedSnapshot::new(feed, timestamp)).await;
            match &result {
                Ok(()) => debug!(path = ?path, items = count, "Wrote feed snapshot"),
                Err(e) => warn!(path = ?path, error = %e, "Failed to write feed snapshot"),
            }
            completion(result.map_err(Into::into));
        });
    }

    fn retrieve(&self, completion: Completion<RetrievalResult>) {
        let path = self.feed_path();
        self.queue.read("retrieve", async move {
            let result = read_snapshot(&path).await;
            if let Err(e) = &result {
                warn!(path = ?path, error = %e, "Failed to read feed snapshot");
            }
            completion(result.map_err(Into::into));
        });
    }
}

impl FeedImageDataStore for FileFeedStore {
    fn insert(&self, data: Vec<u8>, url: &Url, completion: Completion<ImageInsertionResult>) {
        let path = self.image_path(url);
        let url = url.clone();
        self.queue.write("insert_image", async move {
            let result = write_atomically(&path, &data).await;
            match &result {
                Ok(()) => debug!(url = %url, size = data.len(), "Cached image data"),
                Err(e) => warn!(url = %url, error = %e, "Failed to cache image data"),
            }
            completion(result.map_err(Into::into));
        });
    }

    fn retrieve(&self, url: &Url, completion: Completion<ImageRetrievalResult>) {
        let path = self.image_path(url);
        self.queue.read("retrieve_image", async move {
            let result = read_if_present(&path).await;
            completion(result.map_err(Into::into));
        });
    }
}

async fn read_snapshot(path: &Path) -> Result<Option<CachedFeed>> {
    let Some(bytes) = read_if_present(path).await? else {
        return Ok(None);
    };
    let snapshot: FeedSnapshot = serde_json::from_slice(&bytes)?;
    Ok(Some(snapshot.into()))
}

async fn write_snapshot(path: &Path, snapshot: FeedSnapshot) -> Result<()> {
    let bytes = serde_json::to_vec(&snapshot)?;
    write_atomically(path, &bytes).await
}

async fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write to a temporary sibling, then rename over the target
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let temp = path.with_extension("tmp");
    fs::write(&temp, bytes).await?;
    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}
