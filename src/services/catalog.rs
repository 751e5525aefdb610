use crate::db::models::Video;
use crate::db::DbPool;
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool::managed::PoolError<diesel_async::pooled_connection::PoolError>),
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Read access to the video catalog. The trait seam keeps the HTTP
/// handlers testable without a running database.
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    async fn get_all_videos(&self) -> Result<Vec<Video>, CatalogError>;
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, CatalogError>;
}

pub struct PgVideoCatalog {
    pool: DbPool,
}

impl PgVideoCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

// Only fully processed videos are listable.
const READY_STATUS: &str = "ready";

fn ready_videos_query() -> crate::db::schema::videos::BoxedQuery<'static, diesel::pg::Pg> {
    use crate::db::schema::videos::dsl::*;
    videos
        .filter(status.eq(READY_STATUS))
        .order_by(created_at.desc())
        .into_boxed()
}

#[async_trait]
impl VideoCatalog for PgVideoCatalog {
    async fn get_all_videos(&self) -> Result<Vec<Video>, CatalogError> {
        let conn = &mut self.pool.get().await?;
        let list = ready_videos_query().load::<Video>(conn).await?;
        Ok(list)
    }

    async fn get_video(&self, video_id: Uuid) -> Result<Option<Video>, CatalogError> {
        use crate::db::schema::videos::dsl::*;
        let conn = &mut self.pool.get().await?;
        let found = videos
            .find(video_id)
            .first::<Video>(conn)
            .await
            .optional()?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_excludes_unready_videos() {
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&ready_videos_query()).to_string();
        assert!(sql.contains(r#""videos"."status" = $1"#), "{}", sql);
        assert!(sql.contains(r#"["ready"]"#), "{}", sql);
    }

    #[test]
    fn listing_orders_newest_first() {
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&ready_videos_query()).to_string();
        assert!(sql.contains(r#"ORDER BY "videos"."created_at" DESC"#), "{}", sql);
    }
}
