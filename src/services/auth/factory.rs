/// Factory: build the issuer and gate from application `Config`.
use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::config::Config;
use crate::services::auth::{
    clock::{Clock, SystemClock},
    identity::{IdentitySource, IdentitySourceError, StaticIdentitySource},
    issuer::TokenIssuer,
    signing::{SigningKey, SigningKeyError},
    verifier::TokenVerifier,
};

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error(transparent)]
    SigningKey(#[from] SigningKeyError),
    #[error(transparent)]
    Identities(#[from] IdentitySourceError),
}

pub fn build_identity_source(config: &Config) -> Result<Arc<dyn IdentitySource>, FactoryError> {
    let source = match &config.identities_file {
        Some(path) => {
            let source = StaticIdentitySource::from_json_file(path)?;
            info!(path = %path.display(), count = source.len(), "loaded identities");
            source
        }
        None if config.app_env.is_production() => {
            warn!("IDENTITIES_FILE not set; every login will be rejected");
            StaticIdentitySource::default()
        }
        None => {
            warn!("IDENTITIES_FILE not set; using the demo identity");
            StaticIdentitySource::demo()
        }
    };

    Ok(Arc::new(source))
}

/// Both halves get the same key instance; tokens from one must verify in the other.
pub fn build_auth_services(
    config: &Config,
    identities: Arc<dyn IdentitySource>,
    clock: Arc<dyn Clock>,
) -> Result<(Arc<TokenIssuer>, Arc<TokenVerifier>), FactoryError> {
    if config.signing_secret.is_ephemeral() {
        warn!("JWT_SECRET not set; generated an ephemeral signing key");
    }
    let signing_key = Arc::new(SigningKey::from_secret(config.signing_secret.as_bytes())?);

    let issuer = TokenIssuer::new(
        identities,
        signing_key.clone(),
        clock.clone(),
        config.token_ttl_seconds,
        Duration::from_millis(config.identity_lookup_timeout_ms),
    );
    let verifier = TokenVerifier::new(signing_key, clock, config.token_leeway_seconds);

    Ok((Arc::new(issuer), Arc::new(verifier)))
}

pub fn build_from_config(
    config: &Config,
) -> Result<(Arc<TokenIssuer>, Arc<TokenVerifier>), FactoryError> {
    let identities = build_identity_source(config)?;
    build_auth_services(config, identities, Arc::new(SystemClock))
}
