use crate::error::SqliteStoreError;
use feed_core::LocalFeedItem;
use sqlx::FromRow;
use url::Url;
use uuid::Uuid;

/// Feed item row returned from SELECT queries
#[derive(Debug, Clone, FromRow)]
pub struct FeedItemRow {
    pub id: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: String,
}

impl TryFrom<FeedItemRow> for LocalFeedItem {
    type Error = SqliteStoreError;

    fn try_from(row: FeedItemRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| SqliteStoreError::InvalidRow(format!("id {:?}: {e}", row.id)))?;
        let image_url = Url::parse(&row.image_url).map_err(|e| {
            SqliteStoreError::InvalidRow(format!("image_url {:?}: {e}", row.image_url))
        })?;
        Ok(LocalFeedItem {
            id,
            description: row.description,
            location: row.location,
            image_url,
        })
    }
}
