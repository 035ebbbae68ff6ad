//! Failure taxonomy shared by token issuance and the bearer gate.
use axum::http::StatusCode;
use thiserror::Error;

/// Every way authentication can fail.
///
/// All variants are terminal for the current request. Externally the verification kinds
/// collapse to the same 401, but `kind()` keeps them apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed authorization header")]
    MalformedHeader,

    #[error("invalid token")]
    InvalidToken,

    #[error("expired token")]
    ExpiredToken,

    #[error("identity source unavailable")]
    IdentitySourceUnavailable,
}

impl AuthError {
    /// Stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::MissingToken => "missing_token",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidToken => "invalid_token",
            Self::ExpiredToken => "expired_token",
            Self::IdentitySourceUnavailable => "identity_source_unavailable",
        }
    }

    /// Message safe to hand back to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials",
            Self::MissingToken => "No token provided",
            Self::MalformedHeader => "Invalid token format",
            Self::InvalidToken | Self::ExpiredToken => "Invalid or expired token",
            Self::IdentitySourceUnavailable => "Identity service unavailable",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::IdentitySourceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Only infrastructure failures are worth retrying; everything else needs a new login
    /// or a corrected header.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::IdentitySourceUnavailable)
    }
}
