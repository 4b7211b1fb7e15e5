pub mod connections;
pub mod feed;
pub mod home;
pub mod matches;
pub mod messaging;
pub mod notifications;
pub mod profiles;
pub mod sessions;
pub mod skills;
pub mod system;
