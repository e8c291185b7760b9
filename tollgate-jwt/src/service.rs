// Token codec: issuance and validation

use crate::{AccessToken, IdentityClaims, JwtConfig, JwtError, Result};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use tollgate_log::debug;

/// Issues and validates session tokens.
///
/// Holds only immutable state derived from [`JwtConfig`], so a single
/// instance can be shared across threads behind an `Arc` or cloned freely.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create a codec, rejecting configurations that break its invariants.
    pub fn new(config: JwtConfig) -> Result<Self> {
        config.validate()?;

        let header = Header::new(config.algorithm);
        let encoding_key = config.encoding_key();
        let decoding_key = config.decoding_key();
        let validation = config.validation();

        debug!(
            "token codec ready";
            algorithm = format!("{:?}", config.algorithm),
            lifetime = config.lifetime_secs(),
            leeway = config.leeway,
        );

        Ok(Self {
            config,
            header,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Issue a signed token for `subject_id`, valid for the configured
    /// lifetime starting now.
    ///
    /// # Panics
    ///
    /// Panics if `subject_id` is empty. Callers pass identifiers from the
    /// identity store, never raw request input.
    pub fn issue(&self, subject_id: &str, organization_id: Option<&str>) -> Result<String> {
        assert!(!subject_id.is_empty(), "subject_id must not be empty");

        let claims = IdentityClaims::issued_now(
            subject_id,
            organization_id.map(str::to_string),
            self.config.lifetime_secs(),
        );
        let token = self.sign_claims(&claims)?;

        debug!(
            "token issued";
            subject = claims.subject_id,
            superadmin = claims.is_superadmin(),
            expires_at = claims.expires_at,
        );

        Ok(token)
    }

    /// Issue a token wrapped in a bearer response value.
    pub fn issue_token(
        &self,
        subject_id: &str,
        organization_id: Option<&str>,
    ) -> Result<AccessToken> {
        let token = self.issue(subject_id, organization_id)?;
        Ok(AccessToken::bearer(token, self.config.lifetime_secs()))
    }

    /// Sign caller-assembled claims as-is.
    ///
    /// [`issue`](Self::issue) is the normal path; this exists for trusted
    /// internal callers that need to control the timestamps.
    pub fn sign_claims(&self, claims: &IdentityClaims) -> Result<String> {
        encode(&self.header, claims, &self.encoding_key).map_err(JwtError::from)
    }

    /// Verify a token and return its identity claims.
    ///
    /// Checks run in a fixed order: structure and signature, then expiry
    /// (with leeway), then claim extraction. A forged token therefore never
    /// reports [`JwtError::TokenExpired`]. Every failure other than expiry is
    /// collapsed into [`JwtError::InvalidToken`]; the underlying reason is
    /// only logged.
    pub fn decode(&self, token: &str) -> Result<IdentityClaims> {
        // Decode into a raw JSON value first: jsonwebtoken deserializes the
        // target type before checking `exp`, which would let a missing field
        // mask an expired token.
        let data: TokenData<serde_json::Value> =
            decode(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    debug!("token rejected"; reason = "expired");
                    JwtError::TokenExpired
                }
                kind => {
                    debug!("token rejected"; reason = format!("{:?}", kind));
                    JwtError::InvalidToken
                }
            })?;

        let claims: IdentityClaims = serde_json::from_value(data.claims).map_err(|e| {
            debug!("token rejected"; reason = "malformed claims", detail = e);
            JwtError::InvalidToken
        })?;

        if claims.subject_id.is_empty() {
            debug!("token rejected"; reason = "empty subject");
            return Err(JwtError::InvalidToken);
        }

        Ok(claims)
    }

    /// Read the claims of a token without verifying signature or expiry.
    ///
    /// The result must not be trusted for authentication; use it for
    /// diagnostics only.
    pub fn decode_unverified(&self, token: &str) -> Result<IdentityClaims> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<IdentityClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::InvalidToken)
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Current time as a Unix timestamp, on the clock the codec uses.
    pub fn now() -> i64 {
        Utc::now().timestamp()
    }
}
