use actix_files::Files;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod api;
mod config;
mod db;
mod services;

use services::catalog::{PgVideoCatalog, VideoCatalog};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if it exists
    dotenv().ok();

    env_logger::init();

    let config = config::AppConfig::new().expect("Failed to load configuration");
    let config = Arc::new(config);

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );

    // Create the media directory if it doesn't exist
    tokio::fs::create_dir_all(&config.storage.media_root)
        .await
        .expect("Failed to create media directory");

    let pool = db::create_pool(&config.database.url, config.database.max_connections).await;
    let catalog: Arc<dyn VideoCatalog> = Arc::new(PgVideoCatalog::new(pool));

    let c = config.clone();
    HttpServer::new(move || {
        App::new()
            .service(Files::new("/media", c.storage.media_root.clone()))
            .app_data(web::Data::from(catalog.clone()))
            .app_data(web::Data::new(c.clone()))
            .wrap(actix_cors::Cors::permissive()) // Configure properly in production
            .configure(api::configure)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run()
    .await
}
