pub mod connection;
pub mod conversation;
pub mod matching;
pub mod notification;
pub mod option_fields;
pub mod profile;
pub mod session;
pub mod skill;
pub mod token;
