use actix_web::web;

use crate::handlers::sessions;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .service(
                web::resource("")
                    .route(web::get().to(sessions::list_sessions))
                    .route(web::post().to(sessions::create_session))
            )
            .service(
                web::resource("/{session_id}")
                    .route(web::patch().to(sessions::reschedule_session))
            )
            .service(
                web::resource("/{session_id}/status")
                    .route(web::patch().to(sessions::update_session_status))
            )
    );
}
