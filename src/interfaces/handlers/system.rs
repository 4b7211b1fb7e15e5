use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: String,
    storage: String,
    database: String,
    authentication: String,
    feed_subscribers: usize,
}

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime_seconds = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;
    let human_uptime = format_duration(Duration::from_secs(uptime_seconds));

    let database = match &state.services {
        Some(services) => match services.repos.profile_repo.check_connection().await {
            Ok(_) => "OK",
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                "Unavailable"
            }
        },
        None => "Not configured",
    };

    let authentication = if state.token_service.is_some() { "OK" } else { "Not configured" };

    HealthCheckResponse {
        status: if database == "OK" { "healthy" } else { "degraded" }.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.storage.to_string(),
        database: database.to_string(),
        authentication: authentication.to_string(),
        feed_subscribers: state.feed.subscriber_count(),
    }
}

/// Answers even when storage or auth are not configured.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(build_health_response(&state).await)
}
