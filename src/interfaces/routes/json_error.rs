use actix_web::{error::JsonPayloadError, web};

use crate::errors::AppError;

const JSON_LIMIT_BYTES: usize = 64 * 1024;

/// Rewrites extractor failures into the API's `{ "error": ... }` shape.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(|err, _req| json_payload_error(err).into()),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::invalid_field("path", format!("Invalid identifier: {}", err)).into()
    }));
}

fn json_payload_error(err: JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::ContentType => {
            AppError::BadRequest("Content type must be application/json".to_string())
        }
        JsonPayloadError::Deserialize(e) => AppError::BadRequest(format!("Invalid JSON body: {}", e)),
        other => AppError::BadRequest(format!("JSON payload error: {}", other)),
    }
}
