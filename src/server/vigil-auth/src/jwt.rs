//! JWT token validator.
//!
//! Validates HS256 access tokens issued by an OAuth2 authorization server.

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{AuthContext, AuthError, AuthMethod, TokenValidator};

/// Configuration for the JWT validator.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT signing secret (shared with the issuer).
    pub jwt_secret: String,
    /// Expected issuer (e.g., "https://auth.example.com").
    pub issuer: String,
    /// Expected audience (e.g., "vigil").
    pub audience: String,
}

/// Access token claims.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    /// Subject.
    sub: String,
    /// Granted scopes, space separated (RFC 8693 `scope` claim).
    #[serde(default)]
    scope: Option<String>,
    /// Issued at (Unix timestamp).
    iat: u64,
    /// Expiration (Unix timestamp).
    exp: u64,
    /// Issuer.
    iss: String,
    /// Audience.
    aud: String,
}

/// Validator for HS256 JWT access tokens.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    /// Creates a new JWT validator.
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = false;

        Self {
            decoding_key,
            validation,
        }
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn validate(&self, token: &str) -> Result<AuthContext, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidCredentials,
            })?;

        let claims = token_data.claims;
        let scopes = claims
            .scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut ctx = AuthContext::new(claims.sub, AuthMethod::Jwt).with_scopes(scopes);
        ctx.expires_at = Some(claims.exp);

        Ok(ctx)
    }

    fn name(&self) -> &'static str {
        "jwt"
    }
}
