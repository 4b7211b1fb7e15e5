use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod connections;
mod json_error;
mod messaging;
mod notifications;
mod profiles;
mod sessions;
mod skills;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api")
            .configure(profiles::config_routes)
            .configure(skills::config_routes)
            .configure(connections::config_routes)
            .configure(messaging::config_routes)
            .configure(sessions::config_routes)
            .configure(notifications::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
