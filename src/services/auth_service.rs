use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::auth::{AccountPublic, LoginRequest, RegisterRequest},
    errors::AppError,
    models::{account::AccountDoc, revoked_token::RevokedTokenDoc},
    password::{hash_password, verify_password},
    state::AppState,
};

pub(crate) fn single_field_error(
    field: &'static str,
    code: &'static str,
    message: &'static str,
) -> ValidationErrors {
    let mut errs = ValidationErrors::new();
    let mut e = ValidationError::new(code);
    e.message = Some(message.into());
    errs.add(field, e);
    errs
}

/// Mongo E11000, raised when an insert loses a uniqueness race.
pub(crate) fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(we))
            if we.code == 11000
    )
}

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AccountPublic, AppError> {
    req.validate().map_err(AppError::Validation)?;

    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    let mut errs = ValidationErrors::new();
    if state
        .accounts
        .find_one(doc! { "username": &username })
        .await?
        .is_some()
    {
        let mut e = ValidationError::new("unique");
        e.message = Some("Username is already taken.".into());
        errs.add("username", e);
    }
    if state
        .accounts
        .find_one(doc! { "email": &email })
        .await?
        .is_some()
    {
        let mut e = ValidationError::new("unique");
        e.message = Some("Email is already registered.".into());
        errs.add("email", e);
    }
    if !errs.is_empty() {
        return Err(AppError::Validation(errs));
    }

    let password_hash = hash_password(&req.password)?;

    let account = AccountDoc {
        id: ObjectId::new(),
        username,
        email,
        password_hash,
        created_at: BsonDateTime::now(),
    };

    // The unique indexes close the check-then-insert race: a concurrent
    // duplicate surfaces here as E11000, reported like any other
    // validation failure.
    match state.accounts.insert_one(&account).await {
        Ok(_) => {}
        Err(e) if is_duplicate_key(&e) => {
            return Err(AppError::Validation(single_field_error(
                "username",
                "unique",
                "Username or email is already taken.",
            )))
        }
        Err(e) => return Err(e.into()),
    }

    Ok(account.into())
}

/// Not-found and wrong-password collapse into the same error so the
/// response never says which one it was.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AccountPublic, AppError> {
    req.validate().map_err(AppError::RejectedForm)?;

    let account = state
        .accounts
        .find_one(doc! { "username": &req.username })
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &account.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    Ok(account.into())
}

pub async fn current_user(state: &AppState, username: &str) -> Result<AccountPublic, AppError> {
    let account = state
        .accounts
        .find_one(doc! { "username": username })
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(account.into())
}

/// Resolves the token identity to the account id paste ownership is
/// recorded against. A session whose account vanished is no session.
pub async fn account_id_for(state: &AppState, username: &str) -> Result<ObjectId, AppError> {
    let account = state
        .accounts
        .find_one(doc! { "username": username })
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(account.id)
}

/// Puts the access token's jti on the denylist. Revoking twice is
/// harmless: the duplicate-key insert reads as success.
pub async fn revoke(state: &AppState, jti: &str) -> Result<(), AppError> {
    let entry = RevokedTokenDoc {
        id: ObjectId::new(),
        jti: jti.to_string(),
        revoked_at: BsonDateTime::now(),
    };

    match state.revoked_tokens.insert_one(&entry).await {
        Ok(_) => Ok(()),
        Err(e) if is_duplicate_key(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::field_errors;
    use serde_json::json;

    #[test]
    fn single_field_error_carries_the_message() {
        let errs = single_field_error("username", "unique", "Username is already taken.");
        assert_eq!(
            field_errors(&errs)["username"],
            json!(["Username is already taken."])
        );
    }
}
