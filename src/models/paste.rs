use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Public identifier, a v4 UUID. The Mongo `_id` never leaves the server.
    pub paste_uuid: String,
    pub owner_id: ObjectId,

    pub title: String,
    pub language: String,
    pub content: String,

    /// Argon2 hash; pastes without one are world-readable.
    pub password_hash: Option<String>,
    /// Lets authenticated non-owners edit everything except the
    /// access-control fields.
    pub open_edit: bool,

    pub submission_date: BsonDateTime,
    pub edit_date: Option<BsonDateTime>,
    pub expiration_date: Option<BsonDateTime>,
    /// Set by the expiry sweep once the paste is queued for deletion.
    pub deletion_inbound: bool,
}

impl PasteDoc {
    pub fn password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}
