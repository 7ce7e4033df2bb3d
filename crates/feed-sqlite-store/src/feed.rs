use crate::error::Result;
use crate::types::FeedItemRow;
use chrono::{DateTime, Utc};
use feed_core::{CachedFeed, LocalFeedItem};
use sqlx::SqlitePool;

/// Replace the cached feed with `feed` stamped at `timestamp`
pub async fn replace(
    pool: &SqlitePool,
    feed: &[LocalFeedItem],
    timestamp: DateTime<Utc>,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM feed_items")
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO feed_cache (id, timestamp)
        VALUES (1, $1)
        ON CONFLICT (id) DO UPDATE SET timestamp = excluded.timestamp
        "#,
    )
    .bind(timestamp)
    .execute(&mut *tx)
    .await?;

    for (position, item) in feed.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO feed_items (position, id, description, location, image_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(position as i64)
        .bind(item.id.to_string())
        .bind(&item.description)
        .bind(&item.location)
        .bind(item.image_url.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Remove the cached feed (no-op when nothing is cached)
pub async fn delete(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM feed_items")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM feed_cache")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Get the cached feed in insertion order
pub async fn find(pool: &SqlitePool) -> Result<Option<CachedFeed>> {
    let header: Option<(DateTime<Utc>,)> =
        sqlx::query_as("SELECT timestamp FROM feed_cache WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    let Some((timestamp,)) = header else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, FeedItemRow>(
        r#"
        SELECT id, description, location, image_url
        FROM feed_items
        ORDER BY position
        "#,
    )
    .fetch_all(pool)
    .await?;

    let feed = rows
        .into_iter()
        .map(LocalFeedItem::try_from)
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(CachedFeed { feed, timestamp }))
}
