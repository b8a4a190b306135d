use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::{
    handlers::{auth as auth_handlers, paste as paste_handlers},
    state::AppState,
};

pub fn app_router(state: Arc<AppState>) -> Router {
    // Register/login are the only unauthenticated mutating routes; throttle
    // them per client address.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(10)
            .finish()
            .unwrap(),
    );

    let credentials = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route_layer(GovernorLayer::new(governor_conf));

    let session = Router::new()
        .route("/refresh", post(auth_handlers::refresh))
        .route("/revoke", get(auth_handlers::revoke))
        .route("/me", get(auth_handlers::me));

    let paste = Router::new()
        .route("/paste", post(paste_handlers::submit))
        .route(
            "/paste/{uuid}",
            get(paste_handlers::view).post(paste_handlers::unlock),
        )
        .route(
            "/paste/{uuid}/edit",
            get(paste_handlers::editable).post(paste_handlers::edit),
        )
        .route("/paste/{uuid}/delete", get(paste_handlers::delete))
        .route("/paste/list/{page}", get(paste_handlers::list));

    Router::new()
        .nest("/api", credentials.merge(session).merge(paste))
        .with_state(state)
}
