use sqlx::SqlitePool;
use url::Url;

/// Store image bytes for a URL, replacing any previous bytes
pub async fn upsert(pool: &SqlitePool, url: &Url, data: &[u8]) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO feed_images (url, data)
        VALUES ($1, $2)
        ON CONFLICT (url) DO UPDATE SET data = excluded.data
        "#,
    )
    .bind(url.as_str())
    .bind(data)
    .execute(pool)
    .await?;
    Ok(())
}

/// Get image bytes for a URL
pub async fn find(pool: &SqlitePool, url: &Url) -> Result<Option<Vec<u8>>, sqlx::Error> {
    let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT data FROM feed_images WHERE url = $1")
        .bind(url.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.0))
}
