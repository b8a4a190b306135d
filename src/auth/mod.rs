pub mod cookies;
pub mod extract;
pub mod jwt;
pub mod tokens;
