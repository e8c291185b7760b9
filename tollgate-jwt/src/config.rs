// Token codec configuration

use crate::{EnvLoader, JwtError, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use std::fmt;
use std::time::Duration;

/// Default token lifetime (1 hour).
pub const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(3600);

/// Longest accepted token lifetime (10 years). Keeps `iat + lifetime` far
/// from `i64` overflow.
pub const MAX_EXPIRES_IN: Duration = Duration::from_secs(10 * 365 * 24 * 3600);

/// Largest accepted clock-skew tolerance (1 day), in seconds. The expiry
/// check computes `now - leeway` unsigned.
pub const MAX_LEEWAY: u64 = 24 * 3600;

/// Static codec configuration, fixed for the life of the process.
///
/// Rotating `secret` invalidates every token issued under the old value.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC signing secret
    pub secret: String,

    /// Signing algorithm (default: HS256)
    pub algorithm: Algorithm,

    /// Token lifetime (default: 1 hour)
    pub expires_in: Duration,

    /// Clock-skew tolerance applied after `exp` (seconds, default: 0)
    pub leeway: u64,
}

impl JwtConfig {
    /// Create a new configuration with a secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expires_in: DEFAULT_EXPIRES_IN,
            leeway: 0,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set token lifetime
    pub fn with_expiration(mut self, duration: Duration) -> Self {
        self.expires_in = duration;
        self
    }

    /// Set clock-skew tolerance in seconds
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    /// Load configuration from `{prefix}_SECRET`, `{prefix}_ALGORITHM`,
    /// `{prefix}_EXPIRES_IN` and `{prefix}_LEEWAY`, after reading an
    /// optional `.env` file. Only the secret is required.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let loader = EnvLoader::new(Some(prefix.to_string()));
        loader.load_dotenv();

        let mut config = Self::new(loader.require_var("SECRET")?);

        if let Some(algorithm) = loader.parse_var::<Algorithm>("ALGORITHM")? {
            config.algorithm = algorithm;
        }
        if let Some(secs) = loader.parse_var::<u64>("EXPIRES_IN")? {
            config.expires_in = Duration::from_secs(secs);
        }
        if let Some(leeway) = loader.parse_var::<u64>("LEEWAY")? {
            config.leeway = leeway;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the codec relies on.
    pub fn validate(&self) -> Result<()> {
        if self.secret.is_empty() {
            return Err(JwtError::Config("Signing secret cannot be empty".to_string()));
        }

        if self.expires_in.as_secs() == 0 {
            return Err(JwtError::Config(
                "Token lifetime must be at least one second".to_string(),
            ));
        }

        if self.expires_in > MAX_EXPIRES_IN {
            return Err(JwtError::Config(format!(
                "Token lifetime cannot exceed {} seconds",
                MAX_EXPIRES_IN.as_secs()
            )));
        }

        if self.leeway > MAX_LEEWAY {
            return Err(JwtError::Config(format!(
                "Leeway cannot exceed {} seconds",
                MAX_LEEWAY
            )));
        }

        match self.algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(()),
            other => Err(JwtError::Config(format!(
                "{:?} requires a key pair; only HMAC algorithms take a shared secret",
                other
            ))),
        }
    }

    /// Token lifetime in whole seconds
    pub fn lifetime_secs(&self) -> i64 {
        self.expires_in.as_secs() as i64
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }

    /// Validation rules: exactly the configured algorithm, `exp` required
    /// and checked with `leeway`.
    ///
    /// Only `exp` is listed as required. A missing `sub` must surface after
    /// the expiry check, when the payload is deserialized.
    pub fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = self.leeway;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expires_in", &self.expires_in)
            .field("leeway", &self.leeway)
            .finish()
    }
}
