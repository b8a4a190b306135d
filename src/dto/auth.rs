use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::account::AccountDoc;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters."))]
    pub username: String,

    #[validate(email(message = "Invalid email address."))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// What the client learns about an account: its own profile on
/// register/login/me. The password hash never leaves the model layer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountPublic {
    pub username: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub email: String,
}

impl From<AccountDoc> for AccountPublic {
    fn from(a: AccountDoc) -> Self {
        Self {
            username: a.username,
            user_id: a.id.to_hex(),
            email: a.email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevokeResponse {
    pub token_revoked: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub token_refreshed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_short_username_and_bad_email() {
        let req = RegisterRequest {
            username: "ab".into(),
            email: "not-an-email".into(),
            password: "longenough".into(),
        };
        let errs = req.validate().unwrap_err();
        let fields = errs.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("password"));
    }

    #[test]
    fn register_accepts_wellformed_input() {
        let req = RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "hunter2hunter2".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest {
            username: "".into(),
            password: "".into(),
        };
        let errs = req.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("username"));
        assert!(errs.field_errors().contains_key("password"));
    }
}
