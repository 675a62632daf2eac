//! # Vigil API
//!
//! REST layer for Vigil.
//!
//! ## Endpoints
//!
//! - `/v1/sys/health` - Liveness (public)
//! - `/v1/whoami` - Authenticated caller context (bearer token)
//! - `/v1/admin` - Admin endpoint (bearer token with the admin scope)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod handlers;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use auth::{require_bearer, Authenticated, BearerGuard};
pub use state::ApiState;

/// Builds the application router.
pub fn router(state: ApiState) -> Router {
    let whoami = require_bearer(
        Router::new().route("/v1/whoami", get(handlers::whoami)),
        BearerGuard::new(state.clone(), Vec::<String>::new()),
    );

    let admin = require_bearer(
        Router::new().route("/v1/admin", get(handlers::admin)),
        BearerGuard::new(state.clone(), [state.admin_scope.to_string()]),
    );

    Router::new()
        .route("/v1/sys/health", get(handlers::health))
        .merge(whoami)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
