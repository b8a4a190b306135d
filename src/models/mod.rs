pub mod account;
pub mod paste;
pub mod revoked_token;
