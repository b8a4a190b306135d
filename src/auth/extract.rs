use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::doc;
use std::sync::Arc;

use crate::{
    auth::{
        cookies::{ACCESS_COOKIE, REFRESH_COOKIE},
        jwt::{decode_token, Claims, TYP_ACCESS, TYP_REFRESH},
    },
    errors::AppError,
    state::AppState,
};

/// Identity proven by a valid, unrevoked access-token cookie.
#[derive(Debug, Clone)]
pub struct AccessClaims(pub Claims);

/// Identity proven by a valid, unrevoked refresh-token cookie. Only good
/// for minting a replacement access token.
#[derive(Debug, Clone)]
pub struct RefreshClaims(pub Claims);

async fn claims_from_cookie(
    parts: &mut Parts,
    state: &Arc<AppState>,
    cookie: &'static str,
    expected_typ: &str,
) -> Result<Claims, AppError> {
    let jar = parts
        .extract::<CookieJar>()
        .await
        .map_err(|_| AppError::Unauthenticated)?;

    let token = jar
        .get(cookie)
        .ok_or(AppError::Unauthenticated)?
        .value()
        .to_owned();

    let claims = decode_token(&token)?.claims;
    if claims.typ != expected_typ {
        tracing::debug!(typ = %claims.typ, expected = expected_typ, "wrong token type in cookie");
        return Err(AppError::Unauthenticated);
    }

    // The denylist is consulted on every request; nothing is cached.
    if state
        .revoked_tokens
        .find_one(doc! { "jti": &claims.jti })
        .await?
        .is_some()
    {
        tracing::debug!(jti = %claims.jti, "revoked token presented");
        return Err(AppError::Unauthenticated);
    }

    Ok(claims)
}

impl FromRequestParts<Arc<AppState>> for AccessClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        claims_from_cookie(parts, state, ACCESS_COOKIE, TYP_ACCESS)
            .await
            .map(Self)
    }
}

impl FromRequestParts<Arc<AppState>> for RefreshClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        claims_from_cookie(parts, state, REFRESH_COOKIE, TYP_REFRESH)
            .await
            .map(Self)
    }
}
