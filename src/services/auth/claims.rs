use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse-grained role carried in every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Staff,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Staff => "staff",
            Role::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT payload.
///
/// `iat`/`exp` are unix seconds so any HS256 implementation sharing the key can read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject_id: String,
    pub identifier: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub role: Role,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Verified identity attached to a request once the gate lets it through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: String,
    pub identifier: String,
    pub display_name: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    /// Returns `None` when either timestamp is out of chrono's range.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let issued_at = DateTime::from_timestamp(claims.issued_at, 0)?;
        let expires_at = DateTime::from_timestamp(claims.expires_at, 0)?;

        Some(Self {
            subject_id: claims.subject_id,
            identifier: claims.identifier,
            display_name: claims.display_name,
            role: claims.role,
            issued_at,
            expires_at,
        })
    }

    /// Exact role match. Handlers layer their own policy on top.
    pub fn require_role(&self, role: Role) -> bool {
        self.role == role
    }
}
