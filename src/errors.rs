use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed registration input, answered with 400.
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// Malformed login or paste form, answered with 401 like the rest of
    /// the credential failures on those routes.
    #[error("validation failed")]
    RejectedForm(ValidationErrors),

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired or revoked session token.
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("not found")]
    NotFound,

    #[error("password required")]
    PasswordRequired,

    #[error("password incorrect")]
    PasswordIncorrect,

    #[error("database error: {0}")]
    Db(String),

    #[error("JWT error")]
    Jwt,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::Db(e.to_string())
    }
}

/// Flattens validator output into `{"field": ["message", ...]}`.
pub fn field_errors(errors: &ValidationErrors) -> Value {
    let mut out = serde_json::Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| match &e.message {
                Some(m) => json!(m),
                None => json!(e.code),
            })
            .collect();
        out.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(out)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errs) => (
                StatusCode::BAD_REQUEST,
                json!({ "errors": field_errors(errs) }),
            ),
            AppError::RejectedForm(errs) => (
                StatusCode::UNAUTHORIZED,
                json!({ "errors": field_errors(errs) }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "errors": { "username": ["Invalid username or password."] } }),
            ),
            AppError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "unauthorized" }))
            }
            AppError::Forbidden(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Paste with requested UUID was not found." }),
            ),
            AppError::PasswordRequired => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Password required." }))
            }
            AppError::PasswordIncorrect => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Password is incorrect." }),
            ),
            AppError::Db(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "database error" }),
            ),
            AppError::Jwt => (StatusCode::BAD_REQUEST, json!({ "error": "invalid token" })),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": s })),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn field_errors_flatten_to_message_lists() {
        let mut errs = ValidationErrors::new();
        let mut e = ValidationError::new("length");
        e.message = Some("Title is required.".into());
        errs.add("title", e);

        let value = field_errors(&errs);
        assert_eq!(value["title"], json!(["Title is required."]));
    }

    #[test]
    fn field_errors_fall_back_to_code() {
        let mut errs = ValidationErrors::new();
        errs.add("email", ValidationError::new("email"));

        let value = field_errors(&errs);
        assert_eq!(value["email"], json!(["email"]));
    }
}
