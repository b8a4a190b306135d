#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    pub db_name: String,

    pub jwt_access_ttl_seconds: i64,
    pub jwt_refresh_ttl_seconds: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let mongodb_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI is required");
        let db_name = std::env::var("DB_NAME").unwrap_or_else(|_| "pastebox".to_string());

        // Access tokens live 7 days, refresh tokens 14.
        let jwt_access_ttl_seconds = std::env::var("JWT_ACCESS_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7 * 24 * 60 * 60);

        let jwt_refresh_ttl_seconds = std::env::var("JWT_REFRESH_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(14 * 24 * 60 * 60);

        Self {
            mongodb_uri,
            db_name,
            jwt_access_ttl_seconds,
            jwt_refresh_ttl_seconds,
        }
    }
}
