//! Token validator trait.

use async_trait::async_trait;

use crate::{AuthContext, AuthError};

/// Trait for bearer token validators.
///
/// This is the verification hook the [`BearerAuthenticator`](crate::BearerAuthenticator)
/// calls once it has a well-formed `Bearer <token>` header. Implementations
/// decide whether the token is acceptable; they never see or change the
/// authenticator's own state.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validates the given token and returns the authentication context.
    ///
    /// # Arguments
    ///
    /// * `token` - The credential after the `Bearer ` prefix (may be empty)
    ///
    /// # Returns
    ///
    /// * `Ok(AuthContext)` - If the token is valid
    /// * `Err(AuthError)` - If validation fails
    async fn validate(&self, token: &str) -> Result<AuthContext, AuthError>;

    /// Returns the name of this validator for logging/debugging.
    fn name(&self) -> &'static str;
}
