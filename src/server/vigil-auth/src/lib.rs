//! # Vigil Auth
//!
//! Bearer token authentication for Vigil.
//!
//! ## Components
//!
//! - [`BearerAuthenticator`] - parses `Authorization: Bearer <token>` and builds
//!   RFC 6750 `WWW-Authenticate` challenges
//! - [`TokenValidator`] - the token verification hook
//! - Validators: hashed opaque tokens ([`HashedTokenValidator`]) and
//!   HS256 JWTs ([`JwtValidator`])

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bearer;
pub mod challenge;
pub mod context;
pub mod error;
pub mod hashed_token;
pub mod jwt;
pub mod token;
pub mod validator;

pub use bearer::{AuthOutcome, BearerAuthenticator, BEARER_SCHEME};
pub use challenge::{Challenge, ChallengeParams, ErrorCode};
pub use context::{AuthContext, AuthMethod};
pub use error::AuthError;
pub use hashed_token::{HashedTokenValidator, TokenHashFn};
pub use jwt::{JwtConfig, JwtValidator};
pub use validator::TokenValidator;
