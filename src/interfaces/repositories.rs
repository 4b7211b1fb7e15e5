pub mod connection;
pub mod conversation;
pub mod notification;
pub mod profile;
pub mod session;
pub mod skill;
pub mod sqlx_repo;
