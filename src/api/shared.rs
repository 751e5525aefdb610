use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::HttpResponse;
use serde::Serialize;

/// Generic message returned for any failed request; underlying error
/// details stay in the server log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Catalog responses must never be stored or reused by any cache.
pub fn no_store() -> CacheControl {
    CacheControl(vec![CacheDirective::NoStore, CacheDirective::MaxAge(0)])
}

pub fn internal_server_error() -> HttpResponse {
    HttpResponse::InternalServerError()
        .insert_header(no_store())
        .json(ErrorBody {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
        })
}

pub fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .insert_header(no_store())
        .json(ErrorBody {
            error: message.to_string(),
        })
}
