use actix_web::web;

use crate::handlers::profiles;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profile-upsert")
            .route(web::post().to(profiles::upsert_profile))
    )
    .service(
        web::resource("/profiles/{profile_id}")
            .route(web::get().to(profiles::get_profile))
    );
}
