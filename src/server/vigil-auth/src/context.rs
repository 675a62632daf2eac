//! Authentication context types.

use serde::{Deserialize, Serialize};

/// Method used to authenticate the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// HS256 JWT access token.
    Jwt,
    /// Opaque token checked against a stored hash.
    HashedToken,
}

/// Authenticated caller context.
///
/// Returned by a [`TokenValidator`](crate::TokenValidator) on success and
/// handed to request handlers afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Subject identifier (JWT `sub` claim or configured token owner).
    pub subject: String,

    /// Scopes granted by the token.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Authentication method used.
    pub auth_method: AuthMethod,

    /// Token expiration timestamp (Unix seconds).
    pub expires_at: Option<u64>,
}

impl AuthContext {
    /// Creates a context with no scopes and no expiry.
    pub fn new(subject: impl Into<String>, auth_method: AuthMethod) -> Self {
        Self {
            subject: subject.into(),
            scopes: Vec::new(),
            auth_method,
            expires_at: None,
        }
    }

    /// Replaces the granted scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true when every scope in `required` was granted.
    pub fn has_scopes<S: AsRef<str>>(&self, required: &[S]) -> bool {
        contains_all_scopes(&self.scopes, required)
    }
}

/// Returns true when every scope in `required` appears in `available`.
///
/// Scopes compare as whole strings; an empty `required` is always satisfied.
pub fn contains_all_scopes<A, R>(available: &[A], required: &[R]) -> bool
where
    A: AsRef<str>,
    R: AsRef<str>,
{
    required.iter().all(|scope| {
        available
            .iter()
            .any(|candidate| candidate.as_ref() == scope.as_ref())
    })
}
