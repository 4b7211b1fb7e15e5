use std::sync::Arc;

use crate::{
    db::memory::InMemoryStore,
    repositories::{
        connection::ConnectionRepository,
        conversation::ConversationRepository,
        notification::NotificationRepository,
        profile::ProfileRepository,
        session::SessionRepository,
        skill::SkillRepository,
        sqlx_repo::{
            SqlxConnectionRepo, SqlxConversationRepo, SqlxNotificationRepo,
            SqlxProfileRepo, SqlxSessionRepo, SqlxSkillRepo,
        },
    },
};

/// One handle per repository, backed either by PostgreSQL or by a shared
/// in-memory store.
#[derive(Clone)]
pub struct SharedRepositories {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub connection_repo: Arc<dyn ConnectionRepository>,
    pub conversation_repo: Arc<dyn ConversationRepository>,
    pub session_repo: Arc<dyn SessionRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
}

impl SharedRepositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            profile_repo: Arc::new(SqlxProfileRepo::new(pool.clone())),
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            connection_repo: Arc::new(SqlxConnectionRepo::new(pool.clone())),
            conversation_repo: Arc::new(SqlxConversationRepo::new(pool.clone())),
            session_repo: Arc::new(SqlxSessionRepo::new(pool.clone())),
            notification_repo: Arc::new(SqlxNotificationRepo::new(pool)),
        }
    }

    pub fn in_memory(store: InMemoryStore) -> Self {
        SharedRepositories {
            profile_repo: Arc::new(store.clone()),
            skill_repo: Arc::new(store.clone()),
            connection_repo: Arc::new(store.clone()),
            conversation_repo: Arc::new(store.clone()),
            session_repo: Arc::new(store.clone()),
            notification_repo: Arc::new(store),
        }
    }
}
