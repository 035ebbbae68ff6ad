//! Bearer-token gate.
//!
//! Runs a fixed sequence per request and stops at the first failure:
//! header present -> `Bearer ` scheme -> non-empty token -> signature -> expiry.
//! Nothing is mutated, so an aborted request leaves nothing behind.
use std::{fmt, sync::Arc};

use axum::http::{HeaderMap, header};
use jsonwebtoken::errors::ErrorKind;
use tracing::debug;

use crate::services::auth::{
    claims::Principal, clock::Clock, error::AuthError, signing::SigningKey,
};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct TokenVerifier {
    signing_key: Arc<SigningKey>,
    clock: Arc<dyn Clock>,
    leeway_seconds: u64,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(signing_key: Arc<SigningKey>, clock: Arc<dyn Clock>, leeway_seconds: u64) -> Self {
        Self {
            signing_key,
            clock,
            leeway_seconds,
        }
    }

    /// Authenticate a request from its headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = bearer_token(headers)?;
        self.verify_token(token)
    }

    /// Verify a bare token (signature, then expiry) and turn it into a `Principal`.
    pub fn verify_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.signing_key.decode(token).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => debug!("token signature mismatch"),
                other => debug!(error = ?other, "token could not be decoded"),
            }
            AuthError::InvalidToken
        })?;

        if claims.expires_at <= claims.issued_at {
            return Err(AuthError::InvalidToken);
        }

        let now = self.clock.now().timestamp();
        let leeway = i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX);
        if now > claims.expires_at.saturating_add(leeway) {
            return Err(AuthError::ExpiredToken);
        }

        Principal::from_claims(claims).ok_or(AuthError::InvalidToken)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-sensitively with exactly one space.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?;

    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}
