use std::sync::Arc;
use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions},
    Client, Collection, IndexModel,
};

use crate::{
    config::Config,
    models::{account::AccountDoc, paste::PasteDoc, revoked_token::RevokedTokenDoc},
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: Collection<AccountDoc>,
    pub pastes: Collection<PasteDoc>,
    pub revoked_tokens: Collection<RevokedTokenDoc>,
    pub cfg: Arc<Config>,
}

impl AppState {
    pub async fn new(cfg: &Config) -> mongodb::error::Result<Self> {
        let mut opts = ClientOptions::parse(&cfg.mongodb_uri).await?;
        opts.app_name = Some("pastebox".to_string());
        let client = Client::with_options(opts)?;
        let db = client.database(&cfg.db_name);

        let accounts: Collection<AccountDoc> = db.collection("accounts");
        let pastes: Collection<PasteDoc> = db.collection("pastes");
        let revoked_tokens: Collection<RevokedTokenDoc> = db.collection("revoked_tokens");

        // Uniqueness lives in the indexes so concurrent registrations and
        // submissions race on the storage layer, not in handler code.
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let _ = accounts.create_index(username_index).await?;

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let _ = accounts.create_index(email_index).await?;

        let uuid_index = IndexModel::builder()
            .keys(doc! { "paste_uuid": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let _ = pastes.create_index(uuid_index).await?;

        let owner_index = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "submission_date": 1 })
            .build();
        let _ = pastes.create_index(owner_index).await?;

        // jti unique; entries expire once the longest-lived token would
        // have died anyway.
        let jti_index = IndexModel::builder()
            .keys(doc! { "jti": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let _ = revoked_tokens.create_index(jti_index).await?;

        let ttl_index = IndexModel::builder()
            .keys(doc! { "revoked_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(
                        cfg.jwt_refresh_ttl_seconds.max(0) as u64
                    ))
                    .build(),
            )
            .build();
        let _ = revoked_tokens.create_index(ttl_index).await?;

        Ok(Self {
            accounts,
            pastes,
            revoked_tokens,
            cfg: Arc::new(cfg.clone()),
        })
    }
}
