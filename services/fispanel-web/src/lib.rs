//! Fispanel Web - server-rendered browser console
//!
//! Every page is rendered on the server from the same view models the
//! terminal console uses. The operator's bearer token travels in a cookie;
//! their console state (current page, selections, cached sessions, pending
//! notice) lives in [`AppState`], keyed by token.

pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod render;
pub mod state;

use std::sync::Arc;

use axum::{
    http::{HeaderName, Request},
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use config::WebConfig;
pub use error::{WebError, WebResult};
pub use state::AppState;

use handlers::{activities, auth, dashboard, health, licenses, receipts, sessions, users};

/// Build the console router
pub fn create_router(state: Arc<AppState>) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    Router::new()
        // Login
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        // Pages
        .route("/", get(dashboard::show))
        .route("/licenses", get(licenses::list).post(licenses::create))
        .route("/licenses/:id", get(licenses::show))
        .route("/licenses/:id/delete", post(licenses::delete))
        .route("/licenses/:id/extend", post(licenses::extend))
        .route("/licenses/:id/suspend", post(licenses::suspend))
        .route("/users", get(users::list))
        .route("/users/:id", get(users::show))
        .route("/users/:id/delete", post(users::delete))
        .route("/receipts", get(receipts::list))
        .route("/receipts/export", get(receipts::export))
        .route("/activities", get(activities::list))
        .route("/sessions", get(sessions::list))
        .route("/sessions/:id/export", get(sessions::export))
        // Health check
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}
