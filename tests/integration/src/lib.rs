//! Integration tests for the Vigil API.
//!
//! These tests drive the real router over HTTP and check the
//! `WWW-Authenticate` challenges a client actually receives.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::task::JoinHandle;
use vigil_api::ApiState;
use vigil_auth::TokenValidator;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct WhoamiResponse {
    pub subject: String,
    pub scopes: Vec<String>,
    pub auth_method: String,
    pub expires_at: Option<u64>,
}

/// Status and `WWW-Authenticate` value of a response.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub challenge: Option<String>,
    pub body: String,
}

// ============================================================================
// Test Server
// ============================================================================

/// The Vigil router served on an ephemeral local port.
pub struct TestServer {
    handle: JoinHandle<()>,
    pub base_url: String,
}

impl TestServer {
    /// Start a server in realm `realm` using `validator`.
    pub async fn start(realm: &str, validator: Arc<dyn TokenValidator>) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let app = vigil_api::router(ApiState::new(realm, validator, "admin"));
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            handle,
            base_url: format!("http://{}", addr),
        })
    }

    /// Get a configured HTTP client for this server.
    pub fn client(&self) -> VigilClient {
        VigilClient::new(&self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// Test Client
// ============================================================================

/// HTTP client for testing the Vigil API.
pub struct VigilClient {
    client: Client,
    base_url: String,
    authorization: Option<String>,
}

impl VigilClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            authorization: None,
        }
    }

    /// Send `Authorization: Bearer <token>`.
    pub fn with_token(self, token: &str) -> Self {
        self.with_authorization(&format!("Bearer {}", token))
    }

    /// Send a raw `Authorization` header.
    pub fn with_authorization(mut self, value: &str) -> Self {
        self.authorization = Some(value.to_string());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/v1/sys/health")).send().await?;
        Ok(resp.json().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Reply> {
        let mut req = self.client.get(self.url(path));
        if let Some(value) = &self.authorization {
            req = req.header(reqwest::header::AUTHORIZATION, value);
        }
        let resp = req.send().await?;

        let status = resp.status();
        let challenge = resp
            .headers()
            .get(reqwest::header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().await?;

        Ok(Reply {
            status,
            challenge,
            body,
        })
    }

    pub async fn whoami(&self) -> Result<WhoamiResponse> {
        let reply = self.get("/v1/whoami").await?;
        anyhow::ensure!(
            reply.status.is_success(),
            "whoami failed: {} {:?}",
            reply.status,
            reply.challenge
        );
        Ok(serde_json::from_str(&reply.body)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use vigil_auth::{token, HashedTokenValidator, JwtConfig, JwtValidator};

    const JWT_SECRET: &str = "integration-secret-minimum-32-chars";

    fn hashed_validator(secret: &str, scopes: &[&str]) -> Arc<dyn TokenValidator> {
        let hash = token::hash_token(secret).unwrap();
        Arc::new(
            HashedTokenValidator::with_static_hash(hash, "ops").with_scopes(scopes.iter().copied()),
        )
    }

    fn jwt_validator() -> Arc<dyn TokenValidator> {
        Arc::new(JwtValidator::new(JwtConfig {
            jwt_secret: JWT_SECRET.to_string(),
            issuer: "https://auth.example.com".to_string(),
            audience: "vigil".to_string(),
        }))
    }

    fn sign_jwt(scope: &str, exp_offset: i64) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let claims = json!({
            "sub": "user-1",
            "scope": scope,
            "iat": now,
            "exp": now + exp_offset,
            "iss": "https://auth.example.com",
            "aud": "vigil",
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_health_without_token() {
        let server = TestServer::start("X", hashed_validator("t", &[])).await.unwrap();

        let health = server.client().health().await.unwrap();

        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }

    #[tokio::test]
    async fn test_basic_scheme_gets_invalid_request() {
        let server = TestServer::start("X", hashed_validator("t", &[])).await.unwrap();

        let reply = server
            .client()
            .with_authorization("Basic xyz")
            .get("/v1/whoami")
            .await
            .unwrap();

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.challenge.as_deref(),
            Some(
                r#"Bearer realm="X", error="invalid_request", error_description="The authorization header is invalid""#
            )
        );
    }

    #[tokio::test]
    async fn test_wrong_token_gets_invalid_token() {
        let server = TestServer::start("files", hashed_validator("right", &[]))
            .await
            .unwrap();

        let reply = server
            .client()
            .with_token("wrong")
            .get("/v1/whoami")
            .await
            .unwrap();

        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            reply.challenge.as_deref(),
            Some(
                r#"Bearer realm="files", error="invalid_token", error_description="The authorization token is expired, revoked, or invalid""#
            )
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_challenged() {
        let server = TestServer::start("files", hashed_validator("right", &[]))
            .await
            .unwrap();

        let reply = server.client().get("/v1/whoami").await.unwrap();

        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert!(reply
            .challenge
            .unwrap()
            .starts_with(r#"Bearer realm="files""#));
    }

    #[tokio::test]
    async fn test_hashed_token_workflow() {
        let server = TestServer::start("files", hashed_validator("right", &["read"]))
            .await
            .unwrap();
        let client = server.client().with_token("right");

        // 1. Authenticated request succeeds
        let me = client.whoami().await.unwrap();
        assert_eq!(me.subject, "ops");
        assert_eq!(me.auth_method, "hashed_token");
        assert_eq!(me.scopes, vec!["read".to_string()]);

        // 2. Admin route needs the admin scope
        let reply = client.get("/v1/admin").await.unwrap();
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
        assert_eq!(
            reply.challenge.as_deref(),
            Some(
                r#"Bearer realm="files", scope="admin", error="insufficient_scope", error_description="The authorization token has insufficient scope""#
            )
        );
    }

    #[tokio::test]
    async fn test_jwt_workflow() {
        let server = TestServer::start("api", jwt_validator()).await.unwrap();

        // 1. Admin token passes both routes
        let client = server.client().with_token(&sign_jwt("read admin", 3600));
        let me = client.whoami().await.unwrap();
        assert_eq!(me.subject, "user-1");
        assert_eq!(me.auth_method, "jwt");
        assert!(me.expires_at.is_some());

        let reply = client.get("/v1/admin").await.unwrap();
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.challenge.is_none());

        // 2. Expired token is rejected
        let expired = server.client().with_token(&sign_jwt("read admin", -3600));
        let reply = expired.get("/v1/whoami").await.unwrap();
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert!(reply
            .challenge
            .unwrap()
            .contains(r#"error="invalid_token""#));
    }
}
