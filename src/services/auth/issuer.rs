use std::{fmt, sync::Arc, time::Duration};

use chrono::DateTime;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::services::auth::{
    claims::Claims,
    clock::Clock,
    error::AuthError,
    identity::{IdentityRecord, IdentitySource},
    signing::SigningKey,
};

/// Identifier/secret pair presented at login. Lives only for the duration of the call.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("token lifetime of {ttl_seconds}s is out of range")]
    LifetimeOutOfRange { ttl_seconds: u64 },
}

impl IssueError {
    /// The authentication failure, if this is not an internal fault.
    pub fn auth_error(&self) -> Option<AuthError> {
        match self {
            Self::Auth(e) => Some(*e),
            Self::Signing(_) | Self::LifetimeOutOfRange { .. } => None,
        }
    }
}

/// Signed token plus the claims it carries, so handlers don't have to decode it again.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Verifies credentials against an identity source and signs session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    identities: Arc<dyn IdentitySource>,
    signing_key: Arc<SigningKey>,
    clock: Arc<dyn Clock>,
    ttl_seconds: u64,
    lookup_timeout: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("identities", &self.identities.backend_name())
            .field("ttl_seconds", &self.ttl_seconds)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(
        identities: Arc<dyn IdentitySource>,
        signing_key: Arc<SigningKey>,
        clock: Arc<dyn Clock>,
        ttl_seconds: u64,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            identities,
            signing_key,
            clock,
            ttl_seconds,
            lookup_timeout,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Check credentials and issue a signed token.
    ///
    /// - Unknown identifier and wrong secret both yield `InvalidCredentials`.
    /// - A failing or slow identity source yields `IdentitySourceUnavailable`.
    pub async fn issue_token(&self, credentials: &Credentials) -> Result<IssuedToken, IssueError> {
        let record = self.lookup(&credentials.identifier).await?;

        let Some(record) = record else {
            // Burn a comparison so unknown identifiers cost the same as wrong secrets.
            std::hint::black_box(secrets_match(&credentials.secret, ""));
            warn!(kind = AuthError::InvalidCredentials.kind(), "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !secrets_match(&credentials.secret, &record.secret) {
            warn!(kind = AuthError::InvalidCredentials.kind(), "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let claims = self.build_claims(&record)?;
        let token = self.signing_key.sign(&claims)?;

        info!(subject_id = %claims.subject_id, role = %claims.role, "token issued");

        Ok(IssuedToken { token, claims })
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<IdentityRecord>, AuthError> {
        match tokio::time::timeout(self.lookup_timeout, self.identities.find_identity(identifier))
            .await
        {
            Ok(Ok(record)) => Ok(record),
            Ok(Err(e)) => {
                error!(
                    backend = self.identities.backend_name(),
                    error = %e,
                    kind = AuthError::IdentitySourceUnavailable.kind(),
                    "identity lookup failed"
                );
                Err(AuthError::IdentitySourceUnavailable)
            }
            Err(_) => {
                error!(
                    backend = self.identities.backend_name(),
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    kind = AuthError::IdentitySourceUnavailable.kind(),
                    "identity lookup timed out"
                );
                Err(AuthError::IdentitySourceUnavailable)
            }
        }
    }

    fn build_claims(&self, record: &IdentityRecord) -> Result<Claims, IssueError> {
        let now = self.clock.now().timestamp();
        // exp must stay representable as a chrono timestamp and strictly after iat.
        let expires_at = i64::try_from(self.ttl_seconds)
            .ok()
            .filter(|ttl| *ttl > 0)
            .and_then(|ttl| now.checked_add(ttl))
            .filter(|exp| DateTime::from_timestamp(*exp, 0).is_some())
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "token lifetime out of range");
                IssueError::LifetimeOutOfRange {
                    ttl_seconds: self.ttl_seconds,
                }
            })?;

        Ok(Claims {
            subject_id: record.subject_id.clone(),
            identifier: record.identifier.clone(),
            display_name: record.display_name.clone(),
            role: record.role,
            issued_at: now,
            expires_at,
        })
    }
}

// Digests first so the comparison length never depends on the stored secret.
fn secrets_match(provided: &str, stored: &str) -> bool {
    let provided = Sha256::digest(provided.as_bytes());
    let stored = Sha256::digest(stored.as_bytes());
    provided.as_slice().ct_eq(stored.as_slice()).into()
}
