use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    auth::extract::AccessClaims,
    dto::paste::{PasteForm, SubmittedPaste, UnlockRequest},
    errors::AppError,
    services::{auth_service, paste_service},
    state::AppState,
};

pub async fn submit(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
    Json(form): Json<PasteForm>,
) -> Result<Json<SubmittedPaste>, AppError> {
    let owner_id = auth_service::account_id_for(&state, &claims.sub).await?;
    let created = paste_service::create(&state, owner_id, form).await?;
    Ok(Json(created))
}

#[utoipa::path(
    get,
    path = "/api/paste/{uuid}",
    responses(
        (status = 200, description = "Paste content", body = crate::dto::paste::PasteView),
        (status = 401, description = "Password required"),
        (status = 404, description = "No paste with that UUID")
    ),
    tag = "paste"
)]
pub async fn view(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
) -> Result<Json<Value>, AppError> {
    let paste = paste_service::view(&state, &uuid, None).await?;
    Ok(Json(json!({ "paste": paste })))
}

/// `POST /paste/{uuid}`: same view, with a password attempt in the body.
pub async fn unlock(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<String>,
    Json(req): Json<UnlockRequest>,
) -> Result<Json<Value>, AppError> {
    let paste = paste_service::view(&state, &uuid, req.password.as_deref()).await?;
    Ok(Json(json!({ "paste": paste })))
}

pub async fn editable(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
    Path(uuid): Path<String>,
) -> Result<Json<Value>, AppError> {
    let requester_id = auth_service::account_id_for(&state, &claims.sub).await?;
    let paste = paste_service::editable(&state, &uuid, requester_id).await?;
    Ok(Json(json!({ "paste": paste })))
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
    Path(uuid): Path<String>,
    Json(form): Json<PasteForm>,
) -> Result<Json<SubmittedPaste>, AppError> {
    let requester_id = auth_service::account_id_for(&state, &claims.sub).await?;
    let edited = paste_service::edit(&state, &uuid, requester_id, form).await?;
    Ok(Json(edited))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
    Path(uuid): Path<String>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let requester_id = auth_service::account_id_for(&state, &claims.sub).await?;
    paste_service::delete(&state, &uuid, requester_id).await?;
    Ok((StatusCode::NO_CONTENT, Json(json!({ "result": "Paste deleted." }))))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    AccessClaims(claims): AccessClaims,
    Path(page): Path<u64>,
) -> Result<Json<Value>, AppError> {
    let owner_id = auth_service::account_id_for(&state, &claims.sub).await?;
    let page = paste_service::list_for_owner(&state, owner_id, page).await?;
    Ok(Json(json!({ "pastes": page })))
}
