//! Hashed opaque token validator.
//!
//! Validates bearer tokens against a stored Argon2id hash.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use std::sync::Arc;

use crate::{AuthContext, AuthError, AuthMethod, TokenValidator};

/// Callback for retrieving the stored token hash.
///
/// This allows the validator to be decoupled from the storage implementation.
pub type TokenHashFn = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Validator for opaque bearer tokens.
///
/// The token is verified against an Argon2id PHC string; on success the
/// configured subject and scopes are granted.
pub struct HashedTokenValidator {
    /// Function to get the current token hash.
    get_hash: TokenHashFn,
    subject: String,
    scopes: Vec<String>,
}

impl HashedTokenValidator {
    /// Creates a new hashed token validator.
    ///
    /// # Arguments
    ///
    /// * `get_hash` - Callback that returns the stored Argon2id hash of the token.
    /// * `subject` - Subject reported for callers presenting the token.
    pub fn new(get_hash: TokenHashFn, subject: impl Into<String>) -> Self {
        Self {
            get_hash,
            subject: subject.into(),
            scopes: Vec::new(),
        }
    }

    /// Creates a validator with a static hash.
    pub fn with_static_hash(hash: String, subject: impl Into<String>) -> Self {
        Self::new(Arc::new(move || Some(hash.clone())), subject)
    }

    /// Sets the scopes granted to holders of the token.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl TokenValidator for HashedTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthContext, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let hash = (self.get_hash)().ok_or(AuthError::TokenNotFound)?;

        let parsed_hash = PasswordHash::new(&hash)
            .map_err(|_| AuthError::Configuration("invalid token hash".into()))?;

        let valid = Argon2::default()
            .verify_password(token.as_bytes(), &parsed_hash)
            .is_ok();

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AuthContext::new(self.subject.clone(), AuthMethod::HashedToken)
            .with_scopes(self.scopes.iter().cloned()))
    }

    fn name(&self) -> &'static str {
        "hashed-token"
    }
}
