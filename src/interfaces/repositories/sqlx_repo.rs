use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxProfileRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSkillRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxConnectionRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxConversationRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxSessionRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxNotificationRepo {
    pub pool: PgPool,
}
