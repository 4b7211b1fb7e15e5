mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod shared_repos;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, realtime};

use auth::jwt::JwtService;
use errors::{AppError, AuthError};
use realtime::ChangeFeed;
use settings::{AppConfig, StorageBackend};
use shared_repos::SharedRepositories;
use use_cases::{
    connections::ConnectionHandler,
    matching::MatchHandler,
    messaging::MessageHandler,
    notifications::{NotificationHandler, Notifier},
    profiles::ProfileHandler,
    sessions::SessionHandler,
    skills::SkillHandler,
};

/// Use cases wired to one storage backend.
pub struct Services {
    pub profile_handler: ProfileHandler,
    pub skill_handler: SkillHandler,
    pub match_handler: MatchHandler,
    pub connection_handler: ConnectionHandler,
    pub message_handler: MessageHandler,
    pub session_handler: SessionHandler,
    pub notification_handler: NotificationHandler,
    pub repos: SharedRepositories,
}

impl Services {
    pub fn new(repos: SharedRepositories, feed: &ChangeFeed, serve_samples: bool) -> Self {
        let notifier = Notifier::new(repos.notification_repo.clone(), feed.clone());

        Services {
            profile_handler: ProfileHandler::new(repos.profile_repo.clone()),
            skill_handler: SkillHandler::new(
                repos.skill_repo.clone(),
                repos.profile_repo.clone(),
                notifier.clone(),
                feed.clone(),
            ),
            match_handler: MatchHandler::new(
                repos.skill_repo.clone(),
                repos.profile_repo.clone(),
                serve_samples,
            ),
            connection_handler: ConnectionHandler::new(
                repos.connection_repo.clone(),
                repos.profile_repo.clone(),
                notifier.clone(),
                feed.clone(),
            ),
            message_handler: MessageHandler::new(
                repos.conversation_repo.clone(),
                repos.connection_repo.clone(),
                notifier,
                feed.clone(),
            ),
            session_handler: SessionHandler::new(
                repos.session_repo.clone(),
                repos.skill_repo.clone(),
                repos.connection_repo.clone(),
                feed.clone(),
            ),
            notification_handler: NotificationHandler::new(repos.notification_repo.clone(), feed.clone()),
            repos,
        }
    }
}

/// Missing storage or a missing JWT secret leave the matching field empty;
/// requests that need them answer "... is not configured".
pub struct AppState {
    pub services: Option<Services>,
    pub token_service: Option<JwtService>,
    pub feed: ChangeFeed,
    pub storage: StorageBackend,
}

impl AppState {
    pub fn new(config: &AppConfig, repos: Option<SharedRepositories>) -> Self {
        let feed = ChangeFeed::default();
        let token_service = config.jwt_secret.as_deref().map(JwtService::new);

        if token_service.is_none() {
            tracing::warn!("JWT secret is not configured; authenticated routes will fail");
        }

        let services = repos.map(|repos| Services::new(repos, &feed, config.serves_sample_matches()));

        AppState {
            services,
            token_service,
            feed,
            storage: config.storage,
        }
    }

    pub fn services(&self) -> Result<&Services, AppError> {
        self.services
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("Database".to_string()))
    }

    pub fn token_service(&self) -> Result<&JwtService, AuthError> {
        self.token_service.as_ref().ok_or(AuthError::NotConfigured)
    }
}
