//! Bearer authentication middleware and extractor.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use vigil_auth::{AuthContext, AuthOutcome, BearerAuthenticator, Challenge, ChallengeParams};

use crate::ApiState;

/// Description sent when a protected route is called without credentials.
const MISSING_DESCRIPTION: &str = "The authorization header is missing";

/// Per-route authentication requirement.
#[derive(Clone, Debug)]
pub struct BearerGuard {
    state: ApiState,
    scopes: Arc<[String]>,
}

impl BearerGuard {
    /// Requires a bearer token granting every scope in `scopes`.
    pub fn new<I, S>(state: ApiState, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state,
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Runs the authenticator and applies the scope requirement.
    ///
    /// A missing header is answered with a 401 challenge since no other
    /// authenticator is installed; a token lacking a required scope gets a
    /// 403 challenge naming the required scopes.
    pub async fn authenticate(&self, parts: &Parts) -> Result<AuthContext, Challenge> {
        let authenticator = BearerAuthenticator::new(
            &parts.headers,
            &self.state.realm,
            self.state.validator.as_ref(),
        )
        .with_scopes(self.scopes.iter().cloned());

        match authenticator.response().await {
            AuthOutcome::NotApplicable => {
                tracing::debug!(path = %parts.uri.path(), "no authorization header");
                Err(authenticator.challenge_response(
                    StatusCode::UNAUTHORIZED,
                    ChallengeParams::new().description(MISSING_DESCRIPTION),
                ))
            },
            AuthOutcome::Challenged(challenge) => Err(challenge),
            AuthOutcome::Authenticated(ctx) if !ctx.has_scopes(authenticator.scopes()) => {
                tracing::warn!(
                    subject = %ctx.subject,
                    required = ?authenticator.scopes(),
                    "token lacks required scope"
                );
                Err(authenticator.challenge_response(
                    StatusCode::FORBIDDEN,
                    ChallengeParams::new().scopes(authenticator.scopes().iter().cloned()),
                ))
            },
            AuthOutcome::Authenticated(ctx) => Ok(ctx),
        }
    }
}

/// Puts `router`'s routes behind `guard`.
///
/// ```ignore
/// let admin = Router::new().route("/v1/admin", get(handlers::admin));
/// let admin = auth::require_bearer(admin, BearerGuard::new(state.clone(), ["admin"]));
/// ```
pub fn require_bearer(router: Router<ApiState>, guard: BearerGuard) -> Router<ApiState> {
    router.route_layer(middleware::from_fn_with_state(guard, bearer_middleware))
}

async fn bearer_middleware(
    State(guard): State<BearerGuard>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    match guard.authenticate(&parts).await {
        Ok(ctx) => {
            parts.extensions.insert(ctx);
            next.run(Request::from_parts(parts, body)).await
        },
        Err(challenge) => challenge.into_response(),
    }
}

/// Extractor for the [`AuthContext`] stored by [`require_bearer`].
///
/// On a route the middleware does not cover it rejects with an
/// `invalid_token` challenge for the router's realm.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

impl<S> FromRequestParts<S> for Authenticated
where
    ApiState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Challenge;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(Authenticated(ctx.clone()));
        }

        let state = ApiState::from_ref(state);
        tracing::warn!(path = %parts.uri.path(), "no authentication context on request");
        Err(Challenge::bearer(
            &state.realm,
            StatusCode::UNAUTHORIZED,
            ChallengeParams::new(),
        ))
    }
}
