use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::error;

use crate::services::auth::claims::Claims;

/// Algorithm identifier written into every token header.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error)]
pub enum SigningKeyError {
    #[error("signing secret must not be empty")]
    Empty,
}

/// Process-wide HMAC key used for both signing and verification.
///
/// Built once at startup and shared behind an `Arc`; key material is intentionally not
/// printable via Debug.
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn from_secret(secret: &[u8]) -> Result<Self, SigningKeyError> {
        if secret.is_empty() {
            return Err(SigningKeyError::Empty);
        }

        // Expiry is checked by the gate with its own clock so it can be reported separately
        // from a bad signature.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        // jsonwebtoken only knows exp/nbf/aud/iss/sub here; `iat` is enforced by `Claims`.
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        // Header::new sets typ: "JWT"
        let header = Header::new(ALGORITHM);
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            e
        })
    }

    /// Check the signature and decode the payload. Does not look at `exp`.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
