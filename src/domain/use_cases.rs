pub mod connections;
pub mod extractors;
pub mod matching;
pub mod messaging;
pub mod notifications;
pub mod profiles;
pub mod sessions;
pub mod skills;
