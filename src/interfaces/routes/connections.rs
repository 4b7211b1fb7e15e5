use actix_web::web;

use crate::handlers::connections;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/connections")
            .service(
                web::resource("")
                    .route(web::get().to(connections::list_connections))
                    .route(web::post().to(connections::request_connection))
            )
            .service(
                web::resource("/{request_id}/accept")
                    .route(web::post().to(connections::accept_connection))
            )
            .service(
                web::resource("/{request_id}/reject")
                    .route(web::post().to(connections::reject_connection))
            )
    );
}
