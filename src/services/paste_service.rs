use chrono::{Duration, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::paste::{PasteEditView, PasteForm, PastePage, PasteSummary, PasteView, SubmittedPaste},
    errors::AppError,
    models::paste::PasteDoc,
    password::{hash_password, verify_password},
    state::AppState,
};

const PER_PAGE: u64 = 10;

pub async fn create(
    state: &AppState,
    owner_id: ObjectId,
    form: PasteForm,
) -> Result<SubmittedPaste, AppError> {
    form.validate().map_err(AppError::RejectedForm)?;

    let password_hash = match &form.password {
        Some(p) => Some(hash_password(p)?),
        None => None,
    };

    let paste = PasteDoc {
        id: ObjectId::new(),
        paste_uuid: Uuid::new_v4().to_string(),
        owner_id,
        title: form.title,
        language: form.language,
        content: form.content,
        password_hash,
        open_edit: form.open_edit.unwrap_or(false),
        submission_date: BsonDateTime::now(),
        edit_date: None,
        expiration_date: form.expiration.and_then(expiry_from_minutes),
        deletion_inbound: false,
    };

    state.pastes.insert_one(&paste).await?;

    Ok(SubmittedPaste {
        paste_uuid: paste.paste_uuid,
    })
}

/// Visibility is re-evaluated per request; a correct password unlocks this
/// response only.
pub async fn view(
    state: &AppState,
    uuid: &str,
    supplied_password: Option<&str>,
) -> Result<PasteView, AppError> {
    let paste = find_by_uuid(state, uuid).await?.ok_or(AppError::NotFound)?;
    check_password_gate(&paste, supplied_password)?;
    Ok(view_of(paste))
}

pub async fn editable(
    state: &AppState,
    uuid: &str,
    requester_id: ObjectId,
) -> Result<PasteEditView, AppError> {
    let paste = find_by_uuid(state, uuid).await?.ok_or(AppError::NotFound)?;
    ensure_can_modify(&paste, requester_id)?;
    Ok(edit_view_of(paste))
}

pub async fn edit(
    state: &AppState,
    uuid: &str,
    requester_id: ObjectId,
    form: PasteForm,
) -> Result<SubmittedPaste, AppError> {
    let paste = find_by_uuid(state, uuid).await?.ok_or(AppError::NotFound)?;

    form.validate().map_err(AppError::RejectedForm)?;
    ensure_can_modify(&paste, requester_id)?;

    let form = if paste.owner_id == requester_id {
        form
    } else {
        // Open edit lets strangers touch the text, never the lock, the
        // clock, or the open-edit switch itself.
        restrict_to_open_edit_fields(form)
    };

    let mut set = doc! {
        "title": &form.title,
        "language": &form.language,
        "content": &form.content,
        "edit_date": BsonDateTime::now(),
    };
    if let Some(p) = &form.password {
        set.insert("password_hash", hash_password(p)?);
    }
    if let Some(open_edit) = form.open_edit {
        set.insert("open_edit", open_edit);
    }
    if let Some(date) = form.expiration.and_then(expiry_from_minutes) {
        set.insert("expiration_date", date);
    }

    state
        .pastes
        .update_one(doc! { "paste_uuid": uuid }, doc! { "$set": set })
        .await?;

    Ok(SubmittedPaste {
        paste_uuid: paste.paste_uuid,
    })
}

pub async fn delete(state: &AppState, uuid: &str, requester_id: ObjectId) -> Result<(), AppError> {
    let paste = find_by_uuid(state, uuid).await?.ok_or(AppError::NotFound)?;
    if paste.owner_id != requester_id {
        return Err(AppError::Forbidden("You can not delete pastes you do not own."));
    }

    state
        .pastes
        .delete_one(doc! { "paste_uuid": uuid })
        .await?;

    Ok(())
}

pub async fn list_for_owner(
    state: &AppState,
    owner_id: ObjectId,
    page: u64,
) -> Result<PastePage, AppError> {
    let page = page.max(1);
    let filter = doc! { "owner_id": owner_id };

    let total = state.pastes.count_documents(filter.clone()).await?;

    let docs: Vec<PasteDoc> = state
        .pastes
        .find(filter)
        .sort(doc! { "submission_date": 1 })
        .skip((page - 1) * PER_PAGE)
        .limit(PER_PAGE as i64)
        .await?
        .try_collect()
        .await?;

    Ok(page_of(page, total, docs.into_iter().map(summary_of).collect()))
}

async fn find_by_uuid(state: &AppState, uuid: &str) -> Result<Option<PasteDoc>, AppError> {
    Ok(state.pastes.find_one(doc! { "paste_uuid": uuid }).await?)
}

fn check_password_gate(paste: &PasteDoc, supplied: Option<&str>) -> Result<(), AppError> {
    let Some(hash) = &paste.password_hash else {
        // No password on the paste: visible no matter what was supplied.
        return Ok(());
    };
    let supplied = supplied.ok_or(AppError::PasswordRequired)?;
    if !verify_password(supplied, hash)? {
        return Err(AppError::PasswordIncorrect);
    }
    Ok(())
}

fn ensure_can_modify(paste: &PasteDoc, requester_id: ObjectId) -> Result<(), AppError> {
    if paste.owner_id != requester_id && !paste.open_edit {
        return Err(AppError::Forbidden(
            "You are not the owner of this paste, and open edit is not enabled for it.",
        ));
    }
    Ok(())
}

/// Non-owner edits keep the paste's password, expiration and open-edit
/// setting exactly as they are.
fn restrict_to_open_edit_fields(form: PasteForm) -> PasteForm {
    PasteForm {
        password: None,
        open_edit: None,
        expiration: None,
        ..form
    }
}

/// `expiration` is minutes from now; 0 means no change (the edit form's
/// sentinel) and no expiry on create.
fn expiry_from_minutes(minutes: i64) -> Option<BsonDateTime> {
    (minutes > 0).then(|| {
        BsonDateTime::from_millis((Utc::now() + Duration::minutes(minutes)).timestamp_millis())
    })
}

fn strf_date(dt: BsonDateTime) -> String {
    let chrono_dt = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(dt.timestamp_millis())
        .unwrap_or_else(|| chrono::DateTime::<chrono::Utc>::from_timestamp(0, 0).unwrap());
    chrono_dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn view_of(paste: PasteDoc) -> PasteView {
    PasteView {
        paste_uuid: paste.paste_uuid,
        title: paste.title,
        language: paste.language,
        content: paste.content,
        open_edit: paste.open_edit,
        submission_date: strf_date(paste.submission_date),
        edit_date: paste.edit_date.map(strf_date),
        expiration_date: paste.expiration_date.map(strf_date),
    }
}

fn edit_view_of(paste: PasteDoc) -> PasteEditView {
    PasteEditView {
        paste_uuid: paste.paste_uuid,
        title: paste.title,
        language: paste.language,
        content: paste.content,
        open_edit: paste.open_edit,
        submission_date: strf_date(paste.submission_date),
        edit_date: paste.edit_date.map(strf_date),
        expiration: 0,
    }
}

fn summary_of(paste: PasteDoc) -> PasteSummary {
    let password_protected = paste.password_protected();
    PasteSummary {
        uuid: paste.paste_uuid,
        title: paste.title,
        language: paste.language,
        submission_date: strf_date(paste.submission_date),
        expiration_date: paste.expiration_date.map(strf_date),
        edit_date: paste.edit_date.map(strf_date),
        open_edit: paste.open_edit,
        password_protected,
    }
}

fn page_of(page: u64, total: u64, data: Vec<PasteSummary>) -> PastePage {
    let last_page = total.div_ceil(PER_PAGE);
    PastePage {
        current_page: page,
        last_page,
        next_page_url: (page < last_page).then(|| format!("/api/paste/list/{}", page + 1)),
        prev_page_url: (page > 1).then(|| format!("/api/paste/list/{}", page - 1)),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_paste(owner: ObjectId, open_edit: bool, password: Option<&str>) -> PasteDoc {
        PasteDoc {
            id: ObjectId::new(),
            paste_uuid: Uuid::new_v4().to_string(),
            owner_id: owner,
            title: "title".into(),
            language: "rust".into(),
            content: "content".into(),
            password_hash: password.map(|p| hash_password(p).unwrap()),
            open_edit,
            submission_date: BsonDateTime::now(),
            edit_date: None,
            expiration_date: None,
            deletion_inbound: false,
        }
    }

    fn sample_form() -> PasteForm {
        PasteForm {
            title: "new title".into(),
            content: "new content".into(),
            language: "rust".into(),
            password: Some("x".into()),
            expiration: Some(60),
            open_edit: Some(false),
        }
    }

    #[test]
    fn passwordless_paste_ignores_any_supplied_password() {
        let paste = sample_paste(ObjectId::new(), false, None);
        assert!(check_password_gate(&paste, None).is_ok());
        assert!(check_password_gate(&paste, Some("whatever")).is_ok());
    }

    #[test]
    fn protected_paste_walks_the_required_incorrect_correct_ladder() {
        let paste = sample_paste(ObjectId::new(), false, Some("p"));
        assert!(matches!(
            check_password_gate(&paste, None),
            Err(AppError::PasswordRequired)
        ));
        assert!(matches!(
            check_password_gate(&paste, Some("wrong")),
            Err(AppError::PasswordIncorrect)
        ));
        assert!(check_password_gate(&paste, Some("p")).is_ok());
    }

    #[test]
    fn non_owner_is_blocked_unless_open_edit() {
        let owner = ObjectId::new();
        let stranger = ObjectId::new();

        let closed = sample_paste(owner, false, None);
        assert!(ensure_can_modify(&closed, owner).is_ok());
        assert!(matches!(
            ensure_can_modify(&closed, stranger),
            Err(AppError::Forbidden(_))
        ));

        let open = sample_paste(owner, true, None);
        assert!(ensure_can_modify(&open, stranger).is_ok());
    }

    #[test]
    fn open_edit_strips_restricted_fields_and_keeps_the_rest() {
        let restricted = restrict_to_open_edit_fields(sample_form());
        assert_eq!(restricted.title, "new title");
        assert_eq!(restricted.content, "new content");
        assert!(restricted.password.is_none());
        assert!(restricted.open_edit.is_none());
        assert!(restricted.expiration.is_none());
    }

    #[test]
    fn zero_expiration_means_no_expiry() {
        assert!(expiry_from_minutes(0).is_none());
        assert!(expiry_from_minutes(30).is_some());
    }

    #[test]
    fn dates_format_like_the_list_endpoint_promises() {
        assert_eq!(strf_date(BsonDateTime::from_millis(0)), "1970-01-01 00:00:00");
    }

    #[test]
    fn edit_view_hides_the_absolute_expiration() {
        let mut paste = sample_paste(ObjectId::new(), false, None);
        paste.expiration_date = expiry_from_minutes(60);
        paste.deletion_inbound = true;

        let view = edit_view_of(paste);
        assert_eq!(view.expiration, 0);
        // PasteEditView has no expiration_date/deletion_inbound fields at
        // all; the sentinel is the only expiry signal the form sees.
    }

    #[test]
    fn pagination_over_25_pastes() {
        let first = page_of(1, 25, Vec::new());
        assert_eq!(first.last_page, 3);
        assert_eq!(first.next_page_url.as_deref(), Some("/api/paste/list/2"));
        assert!(first.prev_page_url.is_none());

        let last = page_of(3, 25, Vec::new());
        assert!(last.next_page_url.is_none());
        assert_eq!(last.prev_page_url.as_deref(), Some("/api/paste/list/2"));
    }

    #[test]
    fn empty_listing_has_no_links() {
        let page = page_of(1, 0, Vec::new());
        assert_eq!(page.last_page, 0);
        assert!(page.next_page_url.is_none());
        assert!(page.prev_page_url.is_none());
    }

    #[test]
    fn summary_never_exposes_content_or_hash() {
        let paste = sample_paste(ObjectId::new(), true, Some("p"));
        let summary = summary_of(paste);
        assert!(summary.password_protected);
        assert!(summary.open_edit);
        // Content and hash simply are not part of the summary type.
        assert_eq!(summary.language, "rust");
    }
}
