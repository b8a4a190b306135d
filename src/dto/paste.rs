use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Shared submit/edit form. `password`, `expiration` and `open_edit` are
/// optional: absent means "none" on create and "unchanged" on edit, which
/// is also how restricted fields are neutralized for non-owner edits.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasteForm {
    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters."))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required."))]
    pub content: String,

    #[validate(length(min = 1, max = 40, message = "Language must be between 1 and 40 characters."))]
    pub language: String,

    #[validate(length(max = 128, message = "Password must be at most 128 characters."))]
    pub password: Option<String>,

    /// Minutes from now; 0 keeps the current expiration.
    #[validate(range(min = 0, message = "Expiration must not be negative."))]
    pub expiration: Option<i64>,

    pub open_edit: Option<bool>,
}

/// Body of `POST /paste/{uuid}`, supplying a password for a protected
/// paste.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmittedPaste {
    pub paste_uuid: String,
}

/// Full paste as served to readers. Dates are `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PasteView {
    pub paste_uuid: String,
    pub title: String,
    pub language: String,
    pub content: String,
    pub open_edit: bool,
    pub submission_date: String,
    pub edit_date: Option<String>,
    pub expiration_date: Option<String>,
}

/// Paste as loaded into the edit form. The absolute expiration date and
/// the sweep flag stay server-side; `expiration` is the 0 sentinel the
/// client echoes back for "unchanged".
#[derive(Debug, Serialize, ToSchema)]
pub struct PasteEditView {
    pub paste_uuid: String,
    pub title: String,
    pub language: String,
    pub content: String,
    pub open_edit: bool,
    pub submission_date: String,
    pub edit_date: Option<String>,
    pub expiration: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PasteSummary {
    pub uuid: String,
    pub title: String,
    pub language: String,
    pub submission_date: String,
    pub expiration_date: Option<String>,
    pub edit_date: Option<String>,
    pub open_edit: bool,
    pub password_protected: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PastePage {
    pub current_page: u64,
    pub last_page: u64,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
    pub data: Vec<PasteSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> PasteForm {
        PasteForm {
            title: "hello".into(),
            content: "fn main() {}".into(),
            language: "rust".into(),
            password: None,
            expiration: None,
            open_edit: None,
        }
    }

    #[test]
    fn form_accepts_minimal_paste() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn form_rejects_empty_title_and_content() {
        let mut form = valid_form();
        form.title = "".into();
        form.content = "".into();
        let errs = form.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("title"));
        assert!(errs.field_errors().contains_key("content"));
    }

    #[test]
    fn form_rejects_negative_expiration() {
        let mut form = valid_form();
        form.expiration = Some(-5);
        let errs = form.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("expiration"));
    }

    #[test]
    fn optional_fields_are_not_validated_when_absent() {
        let mut form = valid_form();
        form.password = None;
        form.expiration = Some(0);
        assert!(form.validate().is_ok());
    }
}
