//! Route handlers.

use axum::Json;
use serde::{Deserialize, Serialize};
use vigil_auth::AuthContext;

use crate::auth::Authenticated;

/// Body of `GET /v1/sys/health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Body of `GET /v1/admin`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminResponse {
    /// Caller subject.
    pub subject: String,
    /// Scopes granted to the caller.
    pub scopes: Vec<String>,
}

/// Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Echoes the authenticated context.
pub async fn whoami(Authenticated(ctx): Authenticated) -> Json<AuthContext> {
    Json(ctx)
}

/// Requires the admin scope.
pub async fn admin(Authenticated(ctx): Authenticated) -> Json<AdminResponse> {
    Json(AdminResponse {
        subject: ctx.subject,
        scopes: ctx.scopes,
    })
}
