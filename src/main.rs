use std::env;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use once_cell::sync::Lazy;
use skillswap_backend::{
    constants::START_TIME,
    db::{memory::InMemoryStore, postgres::{create_pool, run_migrations}},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::{AppConfig, StorageBackend},
    shared_repos::SharedRepositories,
    telemetry::init_tracing,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let production = env::var("APP_ENV").is_ok_and(|v| v.eq_ignore_ascii_case("production"));
    init_tracing(production);
    Lazy::force(&START_TIME);

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let repos = build_repositories(&config).await?;
    let app_state = web::Data::new(AppState::new(&config, repos));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "🚀 Starting {} v{} on {} ({} storage)",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.storage
    );

    let cors_origins = config.cors_origins();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(build_cors(&cors_origins))
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    tokio::select! {
        res = server => res.context("Server error")?,
        _ = shutdown_signal() => {}
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// `None` leaves data routes answering "Database is not configured".
async fn build_repositories(config: &AppConfig) -> anyhow::Result<Option<SharedRepositories>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Some(SharedRepositories::in_memory(InMemoryStore::new())))
        }
        StorageBackend::Postgres => {
            let Some(database_url) = config.database_url.as_deref() else {
                tracing::warn!("DATABASE_URL is not set; data routes are disabled");
                return Ok(None);
            };

            let pool = create_pool(database_url)
                .await
                .context("Failed to create database connection pool")?;
            run_migrations(&pool).await.context("Failed to run migrations")?;

            Ok(Some(SharedRepositories::postgres(pool)))
        }
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
