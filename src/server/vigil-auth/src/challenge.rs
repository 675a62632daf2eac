//! Bearer challenge responses (RFC 6750 section 3).

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Scope rendered on `insufficient_scope` challenges when none is given.
pub const DEFAULT_SCOPE: &str = "access";

/// Bearer error codes (RFC 6750 section 3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed `Authorization` header.
    InvalidRequest,
    /// Token expired, revoked, malformed or otherwise rejected.
    InvalidToken,
    /// Token lacks a required scope.
    InsufficientScope,
}

impl ErrorCode {
    /// Maps a challenge status to its error code.
    ///
    /// 400 and 403 have dedicated codes; every other status is treated as 401.
    pub fn for_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest,
            StatusCode::FORBIDDEN => Self::InsufficientScope,
            _ => Self::InvalidToken,
        }
    }

    /// Wire name of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidToken => "invalid_token",
            Self::InsufficientScope => "insufficient_scope",
        }
    }

    /// Description used when the caller does not supply one.
    pub fn default_description(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "The authorization header is invalid",
            Self::InvalidToken => "The authorization token is expired, revoked, or invalid",
            Self::InsufficientScope => "The authorization token has insufficient scope",
        }
    }
}

/// Optional inputs to [`Challenge::bearer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeParams {
    /// Overrides the default `error_description`.
    pub description: Option<String>,
    /// Scopes rendered on `insufficient_scope` challenges.
    pub scopes: Option<Vec<String>>,
}

impl ChallengeParams {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `error_description` override.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the scopes for an `insufficient_scope` challenge.
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }
}

/// A challenge response: a status code plus a `WWW-Authenticate` header.
///
/// Returned whenever the authenticator short-circuits a request. Converts into
/// an empty-bodied axum [`Response`].
#[derive(Debug, Clone)]
pub struct Challenge {
    status: StatusCode,
    error: ErrorCode,
    www_authenticate: String,
    headers: HeaderMap,
}

impl Challenge {
    /// Builds a `Bearer` challenge for `realm`.
    ///
    /// The header value has the form
    /// `Bearer realm="<realm>"[, scope="<scopes>"], error="<code>", error_description="<description>"`.
    /// The scope field is only present on 403 challenges.
    pub fn bearer(realm: &str, status: StatusCode, params: ChallengeParams) -> Self {
        let error = ErrorCode::for_status(status);
        let description = params
            .description
            .unwrap_or_else(|| error.default_description().to_string());

        let scope = match error {
            ErrorCode::InsufficientScope => Some(
                params
                    .scopes
                    .filter(|scopes| !scopes.is_empty())
                    .map(|scopes| scopes.join(" "))
                    .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            ),
            _ => None,
        };

        let mut value = format!("Bearer realm={}, ", quoted(realm));
        if let Some(scope) = scope {
            value.push_str(&format!("scope={}, ", quoted(&scope)));
        }
        value.push_str(&format!(
            "error={}, error_description={}",
            quoted(error.as_str()),
            quoted(&description)
        ));

        let mut headers = HeaderMap::new();
        // Control characters other than HTAB are stripped by `quoted`, so this cannot fail.
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            headers.insert(header::WWW_AUTHENTICATE, header_value);
        }

        Self {
            status,
            error,
            www_authenticate: value,
            headers,
        }
    }

    /// Response status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Bearer error code carried by the challenge.
    pub fn error(&self) -> ErrorCode {
        self.error
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `WWW-Authenticate` header value, as rendered (may contain non-ASCII text).
    pub fn www_authenticate(&self) -> &str {
        &self.www_authenticate
    }
}

impl IntoResponse for Challenge {
    fn into_response(self) -> Response {
        (self.status, self.headers).into_response()
    }
}

/// Renders `value` as an RFC 7230 quoted-string.
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
