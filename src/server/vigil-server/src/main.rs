//! Vigil Server - Main entry point.

use std::future::Future;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_api::ApiState;
use vigil_auth::{token, HashedTokenValidator, JwtConfig, JwtValidator, TokenValidator};

/// Random bytes in a dev-mode token.
const DEV_TOKEN_BYTES: usize = 32;

#[derive(Parser, Debug)]
#[command(name = "vigil-server")]
#[command(about = "Vigil - Bearer token protected API server")]
#[command(version)]
struct Cli {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:8300", env = "VIGIL_BIND_ADDRESS")]
    bind: String,

    /// Realm echoed in WWW-Authenticate challenges
    #[arg(long, default_value = "vigil", env = "VIGIL_REALM")]
    realm: String,

    /// Enable development mode (generated token, printed at startup)
    #[arg(long, env = "VIGIL_DEV_MODE")]
    dev: bool,

    /// HS256 secret for JWT access tokens
    #[arg(long, env = "VIGIL_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Expected JWT issuer
    #[arg(long, default_value = "vigil", env = "VIGIL_JWT_ISSUER")]
    jwt_issuer: String,

    /// Expected JWT audience
    #[arg(long, default_value = "vigil", env = "VIGIL_JWT_AUDIENCE")]
    jwt_audience: String,

    /// Argon2id hash of a static bearer token
    #[arg(long, env = "VIGIL_TOKEN_HASH")]
    token_hash: Option<String>,

    /// Scopes granted to the static token (comma separated)
    #[arg(long, env = "VIGIL_TOKEN_SCOPES", value_delimiter = ',')]
    token_scopes: Vec<String>,

    /// Scope required by /v1/admin
    #[arg(long, default_value = "admin", env = "VIGIL_ADMIN_SCOPE")]
    admin_scope: String,
}

/// Picks the validator: JWT, then static hashed token, then dev mode.
fn build_validator(cli: &Cli) -> anyhow::Result<Arc<dyn TokenValidator>> {
    if let Some(secret) = &cli.jwt_secret {
        tracing::info!(
            issuer = %cli.jwt_issuer,
            audience = %cli.jwt_audience,
            "using JWT validator"
        );
        return Ok(Arc::new(JwtValidator::new(JwtConfig {
            jwt_secret: secret.clone(),
            issuer: cli.jwt_issuer.clone(),
            audience: cli.jwt_audience.clone(),
        })));
    }

    if let Some(hash) = &cli.token_hash {
        tracing::info!(scopes = ?cli.token_scopes, "using static token validator");
        return Ok(Arc::new(
            HashedTokenValidator::with_static_hash(hash.clone(), "static")
                .with_scopes(cli.token_scopes.iter().cloned()),
        ));
    }

    if cli.dev {
        let dev_token = token::generate_token(DEV_TOKEN_BYTES);
        let hash = token::hash_token(&dev_token).context("failed to hash dev token")?;
        tracing::warn!("Development mode enabled - DO NOT USE IN PRODUCTION");
        tracing::info!("Dev token: {}", dev_token);
        return Ok(Arc::new(
            HashedTokenValidator::with_static_hash(hash, "dev")
                .with_scopes([cli.admin_scope.clone()]),
        ));
    }

    bail!("no token validator configured: set --jwt-secret, --token-hash or --dev")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Vigil server...");
    tracing::info!("Bind address: {}", cli.bind);

    let validator = build_validator(&cli)?;
    let state = ApiState::new(cli.realm.as_str(), validator, cli.admin_scope.as_str());
    let app = vigil_api::router(state);

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    tracing::info!("Vigil server started successfully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}

/// Resolves once `signal` fires.
///
/// If the signal handler cannot be installed the error is logged and the
/// future never resolves, so the server keeps running instead of stopping.
async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
