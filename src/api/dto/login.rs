use std::fmt;

use serde::{Deserialize, Serialize};

use crate::services::auth::{Credentials, IssuedToken, Role};

/// Request body for `POST /api/auth/login`.
///
/// `email`/`password` are accepted as aliases for older clients. Missing fields are treated
/// as empty, which fails as invalid credentials rather than a 400.
#[derive(Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "email")]
    pub identifier: String,
    #[serde(default, alias = "password")]
    pub secret: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

impl From<LoginRequest> for Credentials {
    fn from(req: LoginRequest) -> Self {
        Credentials::new(req.identifier, req.secret)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: u64,
    pub principal: PrincipalBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrincipalBody {
    pub id: String,
    pub identifier: String,
    pub display_name: String,
    pub role: Role,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        let claims = issued.claims;
        Self {
            success: true,
            token: issued.token,
            token_type: "Bearer",
            expires_in: (claims.expires_at - claims.issued_at).max(0) as u64,
            principal: PrincipalBody {
                id: claims.subject_id,
                identifier: claims.identifier,
                display_name: claims.display_name,
                role: claims.role,
            },
        }
    }
}
