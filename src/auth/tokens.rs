use crate::{
    auth::jwt::{make_token, new_access_claims, new_refresh_claims},
    config::Config,
    errors::AppError,
};

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints the access/refresh pair for a primary login. The access token is
/// marked fresh; the pair is delivered via cookies, never persisted.
pub fn issue_session(cfg: &Config, username: &str) -> Result<IssuedSession, AppError> {
    let access_claims =
        new_access_claims(username.to_string(), cfg.jwt_access_ttl_seconds, true);
    let refresh_claims = new_refresh_claims(username.to_string(), cfg.jwt_refresh_ttl_seconds);

    Ok(IssuedSession {
        access_token: make_token(&access_claims)?,
        refresh_token: make_token(&refresh_claims)?,
    })
}

/// Mints a replacement access token for a refresh-authenticated identity.
/// Not fresh: the holder proved possession of a refresh token, not a
/// password.
pub fn refresh_access(cfg: &Config, username: &str) -> Result<String, AppError> {
    let claims = new_access_claims(username.to_string(), cfg.jwt_access_ttl_seconds, false);
    make_token(&claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::decode_token;

    fn test_config() -> Config {
        Config {
            mongodb_uri: "mongodb://localhost".into(),
            db_name: "test".into(),
            jwt_access_ttl_seconds: 3600,
            jwt_refresh_ttl_seconds: 7200,
        }
    }

    #[test]
    fn issued_pair_carries_the_identity() {
        std::env::set_var("JWT_SECRET", "unit-test-secret");
        let session = issue_session(&test_config(), "alice").unwrap();

        let access = decode_token(&session.access_token).unwrap().claims;
        let refresh = decode_token(&session.refresh_token).unwrap().claims;
        assert_eq!(access.sub, "alice");
        assert!(access.fresh);
        assert_eq!(refresh.sub, "alice");
        assert_eq!(refresh.typ, "refresh");
    }

    #[test]
    fn refreshed_access_token_is_not_fresh() {
        std::env::set_var("JWT_SECRET", "unit-test-secret");
        let token = refresh_access(&test_config(), "alice").unwrap();
        let claims = decode_token(&token).unwrap().claims;
        assert_eq!(claims.typ, "access");
        assert!(!claims.fresh);
    }
}
