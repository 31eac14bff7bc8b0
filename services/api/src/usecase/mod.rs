pub mod auth;
pub mod journal;
pub mod user;
