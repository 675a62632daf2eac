//! Authentication error types.

use thiserror::Error;

/// Errors a [`TokenValidator`](crate::TokenValidator) can report.
///
/// None of these reach the client verbatim: the authenticator turns any of
/// them into an `invalid_token` challenge.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (bad token, wrong signature, etc.).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token has expired.
    #[error("token expired")]
    TokenExpired,

    /// Token not found (no hash stored).
    #[error("token not found")]
    TokenNotFound,

    /// Missing authentication token.
    #[error("missing authentication token")]
    MissingToken,

    /// Validator configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}
