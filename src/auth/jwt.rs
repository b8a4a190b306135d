use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::errors::AppError;

static JWT_SECRET: LazyLock<String> =
    LazyLock::new(|| std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"));

pub const TYP_ACCESS: &str = "access";
pub const TYP_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the session is bound to.
    pub sub: String,
    pub exp: usize,
    pub iat: usize,

    pub typ: String, // "access" | "refresh"
    /// Issued by a primary login, as opposed to a refresh.
    pub fresh: bool,
    /// Unique id, recorded in the denylist on revocation.
    pub jti: String,
}

#[derive(Clone)]
pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl Keys {
    pub fn global() -> Self {
        let secret = JWT_SECRET.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

pub fn new_access_claims(username: String, ttl_seconds: i64, fresh: bool) -> Claims {
    let now = Utc::now();
    Claims {
        sub: username,
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(ttl_seconds)).timestamp() as usize,
        typ: TYP_ACCESS.into(),
        fresh,
        jti: Uuid::new_v4().to_string(),
    }
}

pub fn new_refresh_claims(username: String, ttl_seconds: i64) -> Claims {
    let now = Utc::now();
    Claims {
        sub: username,
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(ttl_seconds)).timestamp() as usize,
        typ: TYP_REFRESH.into(),
        fresh: false,
        jti: Uuid::new_v4().to_string(),
    }
}

pub fn make_token(claims: &Claims) -> Result<String, AppError> {
    let keys = Keys::global();
    encode(&Header::default(), claims, &keys.encoding).map_err(|_| AppError::Jwt)
}

pub fn decode_token(token: &str) -> Result<TokenData<Claims>, AppError> {
    let keys = Keys::global();
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map_err(|_| AppError::Unauthenticated)
}
