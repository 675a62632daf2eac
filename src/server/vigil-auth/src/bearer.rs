//! Bearer challenge authenticator.
//!
//! Reads `Authorization: Bearer <token>`, hands the token to a
//! [`TokenValidator`] and answers with a [`Challenge`] when the header is
//! malformed or the token is rejected.

use axum::http::{header, HeaderMap, StatusCode};

use crate::context::contains_all_scopes;
use crate::{AuthContext, Challenge, ChallengeParams, TokenValidator};

/// Authentication scheme handled by [`BearerAuthenticator`].
pub const BEARER_SCHEME: &str = "Bearer";

/// Result of running the authenticator against one request.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// No `Authorization` header; other authenticators may still run.
    NotApplicable,
    /// The token was accepted.
    Authenticated(AuthContext),
    /// Short-circuit the request with this challenge.
    Challenged(Challenge),
}

impl AuthOutcome {
    /// True only when the token was accepted.
    pub fn has_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The response to send instead of running the handler, if any.
    pub fn response(&self) -> Option<&Challenge> {
        match self {
            Self::Challenged(challenge) => Some(challenge),
            _ => None,
        }
    }

    /// The authenticated context, if any.
    pub fn context(&self) -> Option<&AuthContext> {
        match self {
            Self::Authenticated(ctx) => Some(ctx),
            _ => None,
        }
    }
}

/// Per-request Bearer authenticator.
///
/// Borrows the request headers and a validator; create one for each request.
pub struct BearerAuthenticator<'r> {
    headers: &'r HeaderMap,
    realm: &'r str,
    scopes: Vec<String>,
    validator: &'r dyn TokenValidator,
}

impl<'r> BearerAuthenticator<'r> {
    /// Creates an authenticator for one request.
    pub fn new(headers: &'r HeaderMap, realm: &'r str, validator: &'r dyn TokenValidator) -> Self {
        Self {
            headers,
            realm,
            scopes: Vec::new(),
            validator,
        }
    }

    /// Sets the scopes this authenticator requires.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Always [`BEARER_SCHEME`].
    pub fn scheme(&self) -> &'static str {
        BEARER_SCHEME
    }

    /// Realm echoed in challenges.
    pub fn realm(&self) -> &str {
        self.realm
    }

    /// Configured scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns true when every scope in `requested` is configured.
    pub fn has_scopes<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        contains_all_scopes(&self.scopes, requested)
    }

    /// Authenticates the request.
    ///
    /// 1. No `Authorization` header: [`AuthOutcome::NotApplicable`].
    /// 2. Header is not `<scheme> <token>` with scheme exactly `Bearer`: 400 challenge.
    /// 3. Validator rejects the token: 401 challenge.
    /// 4. Otherwise: [`AuthOutcome::Authenticated`].
    pub async fn response(&self) -> AuthOutcome {
        let Some(value) = self.headers.get(header::AUTHORIZATION) else {
            return AuthOutcome::NotApplicable;
        };

        let token = match value.to_str().ok().and_then(|v| v.split_once(' ')) {
            Some((scheme, token)) if scheme == self.scheme() => token,
            _ => {
                tracing::debug!(realm = %self.realm, "malformed authorization header");
                return AuthOutcome::Challenged(
                    self.challenge_response(StatusCode::BAD_REQUEST, ChallengeParams::new()),
                );
            },
        };

        match self.validator.validate(token).await {
            Ok(ctx) => {
                tracing::debug!(
                    validator = self.validator.name(),
                    subject = %ctx.subject,
                    "bearer token accepted"
                );
                AuthOutcome::Authenticated(ctx)
            },
            Err(err) => {
                tracing::warn!(
                    validator = self.validator.name(),
                    error = %err,
                    "bearer token rejected"
                );
                AuthOutcome::Challenged(
                    self.challenge_response(StatusCode::UNAUTHORIZED, ChallengeParams::new()),
                )
            },
        }
    }

    /// Builds a challenge for this authenticator's realm.
    pub fn challenge_response(&self, status: StatusCode, params: ChallengeParams) -> Challenge {
        Challenge::bearer(self.realm, status, params)
    }
}
