//! Identity lookup used by the token issuer.
//!
//! The issuer only needs one question answered ("who is `identifier`?"), so the seam is a
//! single-method trait. The in-memory source below backs development and small deployments;
//! a database-backed source can be swapped in without touching the issuer.
use std::{collections::HashMap, fmt, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::claims::Role;

#[derive(Debug, Error)]
pub enum IdentitySourceError {
    /// Transport/backend failure. Surfaces as `IdentitySourceUnavailable`.
    #[error("identity backend error: {0}")]
    Backend(String),

    #[error("invalid identity data: {0}")]
    InvalidData(String),
}

/// Stored identity plus the credential to compare against.
#[derive(Clone, Deserialize)]
pub struct IdentityRecord {
    pub subject_id: String,
    pub identifier: String,
    pub display_name: String,
    pub role: Role,
    pub secret: String,
}

impl fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("subject_id", &self.subject_id)
            .field("identifier", &self.identifier)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait IdentitySource: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // `Ok(None)` means "no such identity"; `Err` means the lookup itself failed.
    async fn find_identity(
        &self,
        identifier: &str,
    ) -> Result<Option<IdentityRecord>, IdentitySourceError>;
}

/// Fixed set of identities held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentitySource {
    records: HashMap<String, IdentityRecord>,
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_ascii_lowercase()
}

impl StaticIdentitySource {
    pub fn new(records: impl IntoIterator<Item = IdentityRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (normalize(&r.identifier), r))
            .collect();
        Self { records }
    }

    /// Single demo account for local development.
    pub fn demo() -> Self {
        Self::new([IdentityRecord {
            subject_id: "123".to_string(),
            identifier: "owner@demo.com".to_string(),
            display_name: "Demo Owner".to_string(),
            role: Role::Owner,
            secret: "password123".to_string(),
        }])
    }

    /// Parse a JSON array of identity records.
    pub fn from_json(raw: &str) -> Result<Self, IdentitySourceError> {
        let records: Vec<IdentityRecord> = serde_json::from_str(raw)
            .map_err(|e| IdentitySourceError::InvalidData(e.to_string()))?;
        Ok(Self::new(records))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, IdentitySourceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IdentitySourceError::InvalidData(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl IdentitySource for StaticIdentitySource {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn find_identity(
        &self,
        identifier: &str,
    ) -> Result<Option<IdentityRecord>, IdentitySourceError> {
        Ok(self.records.get(&normalize(identifier)).cloned())
    }
}
