use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Upper bound for token lifetime (one year).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;
/// Upper bound for accepted clock skew (one hour).
pub const MAX_TOKEN_LEEWAY_SECONDS: u64 = 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Raw signing secret. Never printed.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
    ephemeral: bool,
}

impl SigningSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ephemeral: false,
        }
    }

    fn generate() -> Result<Self, ConfigError> {
        let mut bytes = vec![0u8; 32];
        getrandom::fill(&mut bytes).map_err(|_| ConfigError::Invalid("JWT_SECRET"))?;
        Ok(Self {
            bytes,
            ephemeral: true,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the secret was generated at startup, so tokens won't survive a restart.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.bytes.len())
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // HS256 key shared by issuer and gate
    pub signing_secret: SigningSecret,
    // Token lifetime and allowed clock skew (seconds)
    pub token_ttl_seconds: u64,
    pub token_leeway_seconds: u64,

    pub identity_lookup_timeout_ms: u64,
    pub identities_file: Option<PathBuf>,

    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process environment in production).
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3001,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let signing_secret = match (var("JWT_SECRET"), var("JWT_SECRET_BASE64")) {
            (Some(raw), _) if !raw.is_empty() => SigningSecret::new(raw.into_bytes()),
            (_, Some(encoded)) if !encoded.is_empty() => {
                let bytes = STANDARD
                    .decode(encoded.trim())
                    .map_err(|_| ConfigError::Invalid("JWT_SECRET_BASE64"))?;
                if bytes.is_empty() {
                    return Err(ConfigError::Invalid("JWT_SECRET_BASE64"));
                }
                SigningSecret::new(bytes)
            }
            _ if app_env.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => SigningSecret::generate()?,
        };

        let token_ttl_seconds = parse_or(&var, "TOKEN_TTL_SECONDS", 86_400)?; // 24h
        if token_ttl_seconds == 0 || token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECONDS"));
        }
        let token_leeway_seconds = parse_or(&var, "TOKEN_LEEWAY_SECONDS", 0)?;
        if token_leeway_seconds > MAX_TOKEN_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("TOKEN_LEEWAY_SECONDS"));
        }

        let identity_lookup_timeout_ms = parse_or(&var, "IDENTITY_LOOKUP_TIMEOUT_MS", 2_000)?;
        if identity_lookup_timeout_ms == 0 {
            return Err(ConfigError::Invalid("IDENTITY_LOOKUP_TIMEOUT_MS"));
        }
        let identities_file = var("IDENTITIES_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let body_limit_bytes = parse_or(&var, "BODY_LIMIT_BYTES", 1024 * 1024)?;
        let request_timeout_seconds = parse_or(&var, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            signing_secret,
            token_ttl_seconds,
            token_leeway_seconds,
            identity_lookup_timeout_ms,
            identities_file,
            body_limit_bytes,
            request_timeout_seconds,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
