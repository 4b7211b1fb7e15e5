use actix_web::web;

use crate::handlers::messaging;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conversations")
            .service(
                web::resource("")
                    .route(web::get().to(messaging::list_conversations))
            )
            .service(
                web::resource("/{conversation_id}/messages")
                    .route(web::get().to(messaging::list_messages))
            )
    )
    .service(
        web::resource("/messages")
            .route(web::post().to(messaging::send_message))
    );
}
