pub mod auth;
pub mod paste;
