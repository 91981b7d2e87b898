//! HTTP route handlers for the admin function.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # createAdminUser (POST creates, OPTIONS preflight, anything else 405)
//! ANY  /createAdminUser        - Create an admin account
//! ANY  /                       - Same handler, for platforms that mount the
//!                                function at the root
//! ```
//!
//! Every response carries permissive CORS headers.

pub mod create_admin;

use axum::{
    Router,
    http::{
        HeaderValue,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    routing::{any, get},
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

/// Function routes (without state).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/createAdminUser", any(create_admin::create_admin_user))
        .route("/", any(create_admin::create_admin_user))
}

/// Full application router: health check, function routes and CORS headers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Firebase.
async fn health() -> &'static str {
    "ok"
}
