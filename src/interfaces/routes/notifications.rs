use actix_web::web;

use crate::handlers::{feed, notifications};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .service(
                web::resource("")
                    .route(web::get().to(notifications::list_notifications))
            )
            .service(
                web::resource("/read-all")
                    .route(web::post().to(notifications::mark_all_notifications_read))
            )
            .service(
                web::resource("/{notification_id}/read")
                    .route(web::post().to(notifications::mark_notification_read))
            )
    )
    .service(
        web::resource("/feed/{entity}")
            .route(web::get().to(feed::subscribe))
    );
}
