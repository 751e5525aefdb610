use crate::api::shared::{self, no_store};
use crate::config::AppConfig;
use crate::services::catalog::VideoCatalog;
use crate::services::sprites;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/videos")
            .route("", web::get().to(list_videos))
            .route("/{id}/sprites", web::post().to(generate_sprites)),
    );
}

/// Returns the full catalog as a JSON array. The response is marked
/// non-cacheable so clients always see the current listing.
pub async fn list_videos(catalog: web::Data<dyn VideoCatalog>) -> HttpResponse {
    match catalog.get_all_videos().await {
        Ok(videos) => HttpResponse::Ok().insert_header(no_store()).json(videos),
        Err(e) => {
            log::error!("Failed to list videos: {}", e);
            shared::internal_server_error()
        }
    }
}

/// Kicks off sprite sheet generation for a stored video. The work runs
/// in a background task; the request returns as soon as it is queued.
pub async fn generate_sprites(
    path: web::Path<Uuid>,
    catalog: web::Data<dyn VideoCatalog>,
    config: web::Data<Arc<AppConfig>>,
) -> HttpResponse {
    let video_id = path.into_inner();
    match catalog.get_video(video_id).await {
        Ok(Some(_)) => {
            let media_root = PathBuf::from(&config.storage.media_root);
            let sprite_cfg = config.sprites.clone();
            tokio::spawn(async move {
                if let Err(e) = sprites::generate(&media_root, video_id, &sprite_cfg).await {
                    log::error!("Sprite generation failed for {}: {}", video_id, e);
                }
            });
            HttpResponse::Accepted().json(json!({
                "id": video_id,
                "status": "generating"
            }))
        }
        Ok(None) => shared::not_found("Video not found"),
        Err(e) => {
            log::error!("Failed to look up video {}: {}", video_id, e);
            shared::internal_server_error()
        }
    }
}
