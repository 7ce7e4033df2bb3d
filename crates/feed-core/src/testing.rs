//! Fixtures and behavioural checks for store implementations
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! the backend crates' tests. Every backend runs the same `assert_*` checks.

use crate::cache::{
    CachedFeed, DeletionResult, FeedImageDataStore, FeedStore, ImageInsertionResult,
    ImageRetrievalResult, InsertionResult, LocalFeedItem, RetrievalResult,
};
use crate::error::StoreError;
use crate::feature::FeedItem;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use url::Url;
use uuid::Uuid;

pub fn any_url() -> Url {
    Url::parse("https://any-url.example.com/image.png").unwrap()
}

pub fn unique_item() -> FeedItem {
    let id = Uuid::new_v4();
    FeedItem::new(
        id,
        Some("any description".to_string()),
        Some("any location".to_string()),
        Url::parse(&format!("https://images.example.com/{id}.jpg")).unwrap(),
    )
}

pub fn unique_feed() -> Vec<FeedItem> {
    vec![unique_item(), unique_item()]
}

pub fn unique_local_feed() -> Vec<LocalFeedItem> {
    unique_feed().iter().map(LocalFeedItem::from).collect()
}

pub fn any_store_error() -> StoreError {
    StoreError::from("any store error")
}

pub fn any_data() -> Vec<u8> {
    b"any data".to_vec()
}

pub async fn retrieve<S: FeedStore + ?Sized>(store: &S) -> RetrievalResult {
    let (tx, rx) = oneshot::channel();
    store.retrieve(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.await.expect("store dropped the retrieval completion")
}

pub async fn insert<S: FeedStore + ?Sized>(
    store: &S,
    feed: Vec<LocalFeedItem>,
    timestamp: DateTime<Utc>,
) -> InsertionResult {
    let (tx, rx) = oneshot::channel();
    store.insert(
        feed,
        timestamp,
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    rx.await.expect("store dropped the insertion completion")
}

pub async fn delete<S: FeedStore + ?Sized>(store: &S) -> DeletionResult {
    let (tx, rx) = oneshot::channel();
    store.delete_cached_feed(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    rx.await.expect("store dropped the deletion completion")
}

pub async fn insert_image<S: FeedImageDataStore + ?Sized>(
    store: &S,
    data: Vec<u8>,
    url: &Url,
) -> ImageInsertionResult {
    let (tx, rx) = oneshot::channel();
    FeedImageDataStore::insert(
        store,
        data,
        url,
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    rx.await.expect("store dropped the image insertion completion")
}

pub async fn retrieve_image<S: FeedImageDataStore + ?Sized>(
    store: &S,
    url: &Url,
) -> ImageRetrievalResult {
    let (tx, rx) = oneshot::channel();
    FeedImageDataStore::retrieve(
        store,
        url,
        Box::new(move |result| {
            let _ = tx.send(result);
        }),
    );
    rx.await.expect("store dropped the image retrieval completion")
}

// Feed store checks

pub async fn assert_retrieve_delivers_empty_on_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    assert!(matches!(retrieve(store).await, Ok(None)));
}

pub async fn assert_retrieve_has_no_side_effects_on_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    assert!(matches!(retrieve(store).await, Ok(None)));
    assert!(matches!(retrieve(store).await, Ok(None)));
}

pub async fn assert_retrieve_delivers_inserted_values<S: FeedStore + ?Sized>(store: &S) {
    let feed = unique_local_feed();
    let timestamp = Utc::now();

    insert(store, feed.clone(), timestamp)
        .await
        .expect("insertion should succeed");

    let cached = retrieve(store).await.expect("retrieval should succeed");
    assert_eq!(cached, Some(CachedFeed { feed, timestamp }));
}

pub async fn assert_retrieve_has_no_side_effects_on_non_empty_cache<S: FeedStore + ?Sized>(
    store: &S,
) {
    let feed = unique_local_feed();
    let timestamp = Utc::now();
    insert(store, feed.clone(), timestamp).await.unwrap();

    let first = retrieve(store).await.unwrap();
    let second = retrieve(store).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Some(CachedFeed { feed, timestamp }));
}

pub async fn assert_insert_overrides_previous_values<S: FeedStore + ?Sized>(store: &S) {
    insert(store, unique_local_feed(), Utc::now()).await.unwrap();

    let latest = unique_local_feed();
    let latest_timestamp = Utc::now();
    insert(store, latest.clone(), latest_timestamp).await.unwrap();

    assert_eq!(
        retrieve(store).await.unwrap(),
        Some(CachedFeed {
            feed: latest,
            timestamp: latest_timestamp,
        })
    );
}

pub async fn assert_delete_has_no_side_effects_on_empty_cache<S: FeedStore + ?Sized>(store: &S) {
    delete(store).await.expect("deleting an empty cache should succeed");
    assert!(matches!(retrieve(store).await, Ok(None)));
}

pub async fn assert_delete_empties_previous_values<S: FeedStore + ?Sized>(store: &S) {
    insert(store, unique_local_feed(), Utc::now()).await.unwrap();

    delete(store).await.expect("deletion should succeed");
    assert!(matches!(retrieve(store).await, Ok(None)));
}

/// Side effects submitted back-to-back complete in submission order
pub async fn assert_side_effects_run_serially<S: FeedStore + ?Sized>(store: &S) {
    let completed = Arc::new(Mutex::new(Vec::new()));
    let mut receivers = Vec::new();

    let mut track = |label: &'static str| {
        let (tx, rx) = oneshot::channel::<()>();
        receivers.push(rx);
        let completed = Arc::clone(&completed);
        move || {
            completed.lock().push(label);
            let _ = tx.send(());
        }
    };

    let first = track("insert-1");
    store.insert(
        unique_local_feed(),
        Utc::now(),
        Box::new(move |_| first()),
    );
    let second = track("delete");
    store.delete_cached_feed(Box::new(move |_| second()));
    let third = track("insert-2");
    store.insert(
        unique_local_feed(),
        Utc::now(),
        Box::new(move |_| third()),
    );

    for rx in receivers {
        rx.await.expect("store dropped a completion");
    }
    assert_eq!(*completed.lock(), vec!["insert-1", "delete", "insert-2"]);
}

// Image data store checks

pub async fn assert_image_retrieve_delivers_none_when_missing<S: FeedImageDataStore + ?Sized>(
    store: &S,
) {
    assert!(matches!(retrieve_image(store, &any_url()).await, Ok(None)));
}

pub async fn assert_image_retrieve_delivers_stored_data<S: FeedImageDataStore + ?Sized>(
    store: &S,
) {
    let url = any_url();
    let data = any_data();
    insert_image(store, data.clone(), &url).await.unwrap();

    assert_eq!(retrieve_image(store, &url).await.unwrap(), Some(data));
}

pub async fn assert_image_retrieve_ignores_other_urls<S: FeedImageDataStore + ?Sized>(store: &S) {
    let stored = Url::parse("https://a-url.example.com/a.png").unwrap();
    let other = Url::parse("https://another-url.example.com/b.png").unwrap();
    insert_image(store, any_data(), &stored).await.unwrap();

    assert!(matches!(retrieve_image(store, &other).await, Ok(None)));
}

pub async fn assert_image_insert_overrides_previous_data<S: FeedImageDataStore + ?Sized>(
    store: &S,
) {
    let url = any_url();
    insert_image(store, b"first".to_vec(), &url).await.unwrap();
    insert_image(store, b"last".to_vec(), &url).await.unwrap();

    assert_eq!(
        retrieve_image(store, &url).await.unwrap(),
        Some(b"last".to_vec())
    );
}
