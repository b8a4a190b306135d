use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,
    pub email: String,

    pub password_hash: String,
    pub created_at: BsonDateTime,
}
