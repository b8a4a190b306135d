pub mod auth_service;
pub mod paste_service;
