//! Feed client - loads the feed (remote first, cache when offline) and
//! optionally warms the image cache

use feed_api::ReqwestHttpClient;
use feed_client::{
    main_queue, Config, FeedClientError, FeedComposer, FeedPipelines, MainLoop, MainQueue, Result,
    StoreKind,
};
use feed_core::{FeedImageDataStore, FeedStore};
use feed_file_store::FileFeedStore;
use feed_sqlite_store::SqliteFeedStore;
use futures::future::join_all;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("feed_client=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::from_env()?;
    info!("Feed URL: {}", config.feed_url);
    info!("Store: {:?} at {:?}", config.store_kind, config.store_path);
    info!("HTTP timeout: {} seconds", config.http_timeout.as_secs());

    let runtime = Handle::current();
    let (queue, mut main_loop) = main_queue();
    let client = Arc::new(ReqwestHttpClient::with_timeout(
        config.http_timeout,
        runtime.clone(),
    )?);

    match config.store_kind {
        StoreKind::File => {
            let store = Arc::new(FileFeedStore::new(&config.store_path, &runtime));
            run(&config, store, &client, queue, &mut main_loop).await?;
        }
        StoreKind::Sqlite => {
            let store = Arc::new(SqliteFeedStore::open(&config.store_path, &runtime).await?);
            run(&config, store, &client, queue, &mut main_loop).await?;
        }
    }

    info!("Done");
    Ok(())
}

async fn run<S>(
    config: &Config,
    store: Arc<S>,
    client: &Arc<ReqwestHttpClient>,
    queue: MainQueue,
    main_loop: &mut MainLoop,
) -> Result<()>
where
    S: FeedStore + FeedImageDataStore + Flush + 'static,
{
    let pipelines = FeedComposer::new(config.feed_url.clone()).compose(
        Arc::clone(&store),
        Arc::clone(client),
        Arc::new(queue),
    );

    let (tx, rx) = oneshot::channel();
    let _task = pipelines.feed_loader.load_feed(Box::new(move |result| {
        let _ = tx.send(result);
    }));
    let feed = main_loop
        .run_until(rx)
        .await
        .map_err(|_| FeedClientError::Interrupted("feed load"))??;

    info!(items = feed.len(), "Loaded feed");
    for item in &feed {
        info!(
            id = %item.id,
            description = item.description.as_deref().unwrap_or(""),
            location = item.location.as_deref().unwrap_or(""),
            image = %item.image_url,
            "Feed item"
        );
    }

    if config.prefetch_images {
        prefetch_images(&pipelines, &feed, main_loop).await;
    }

    // Write-through saves are issued from request callbacks
    client.wait_idle().await;
    pipelines.validate_cache();
    // the loaders must outlive their pending store callbacks
    store.flush().await;
    drop(pipelines);
    Ok(())
}

/// Stores whose queued operations can be awaited before exit
trait Flush {
    async fn flush(&self);
}

impl Flush for FileFeedStore {
    async fn flush(&self) {
        FileFeedStore::flush(self).await;
    }
}

impl Flush for SqliteFeedStore {
    async fn flush(&self) {
        SqliteFeedStore::flush(self).await;
    }
}

async fn prefetch_images<S: FeedStore + 'static>(
    pipelines: &FeedPipelines<S>,
    feed: &[feed_core::FeedItem],
    main_loop: &mut MainLoop,
) {
    let mut pending = Vec::with_capacity(feed.len());
    let mut tasks = Vec::with_capacity(feed.len());
    for item in feed {
        let (tx, rx) = oneshot::channel();
        tasks.push(pipelines.image_loader.load_image_data(
            &item.image_url,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        ));
        pending.push(rx);
    }

    let results = main_loop.run_until(join_all(pending)).await;
    for (item, result) in feed.iter().zip(results) {
        match result {
            Ok(Ok(data)) => info!(url = %item.image_url, size = data.len(), "Image ready"),
            Ok(Err(error)) => warn!(url = %item.image_url, %error, "Image unavailable"),
            Err(_) => warn!(url = %item.image_url, "Image load interrupted"),
        }
    }
}
