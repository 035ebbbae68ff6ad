/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to clone (everything inside is an Arc)
 */
use std::sync::Arc;

use crate::services::auth::{TokenIssuer, TokenVerifier};

#[derive(Clone, Debug)]
pub struct AppState {
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(issuer: Arc<TokenIssuer>, verifier: Arc<TokenVerifier>) -> Self {
        Self { issuer, verifier }
    }
}
