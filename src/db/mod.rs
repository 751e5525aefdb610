pub mod models;
pub mod schema;

use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub async fn create_pool(database_url: &str, max_connections: u32) -> DbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager)
        .max_size(max_connections as usize)
        .build()
        .expect("Failed to create database pool")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pool_caps_connections_at_configured_max() {
        // Connections are opened lazily, so no server is needed here.
        let pool = create_pool("postgres://localhost/video_catalog_test", 3).await;
        assert_eq!(pool.status().max_size, 3);
    }
}
