use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::{
    auth::{
        cookies::{clear_session_cookies, set_access_cookie, set_session_cookies},
        extract::{AccessClaims, RefreshClaims},
        tokens::{issue_session, refresh_access},
    },
    dto::auth::{AccountPublic, LoginRequest, RefreshResponse, RegisterRequest, RevokeResponse},
    errors::AppError,
    services::auth_service,
    state::AppState,
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AccountPublic>), AppError> {
    let account = auth_service::register(&state, req).await?;

    let session = issue_session(&state.cfg, &account.username)?;
    let jar = set_session_cookies(jar, session);

    Ok((StatusCode::CREATED, jar, Json(account)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AccountPublic>), AppError> {
    let account = auth_service::login(&state, req).await?;

    let session = issue_session(&state.cfg, &account.username)?;
    let jar = set_session_cookies(jar, session);

    Ok((jar, Json(account)))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
) -> Result<Json<AccountPublic>, AppError> {
    let account = auth_service::current_user(&state, &claims.sub).await?;
    Ok(Json(account))
}

/// Denylists the presented access token and drops both session cookies.
pub async fn revoke(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RevokeResponse>), AppError> {
    auth_service::revoke(&state, &claims.jti).await?;

    let jar = clear_session_cookies(jar);
    Ok((jar, Json(RevokeResponse { token_revoked: true })))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    RefreshClaims(claims): RefreshClaims,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshResponse>), AppError> {
    let access = refresh_access(&state.cfg, &claims.sub)?;

    let jar = set_access_cookie(jar, access);
    Ok((jar, Json(RefreshResponse { token_refreshed: true })))
}
