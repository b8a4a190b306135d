use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Denylist entry for an access token invalidated before its natural
/// expiry. Looked up by `jti` on every authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokedTokenDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub jti: String,
    pub revoked_at: BsonDateTime,
}
