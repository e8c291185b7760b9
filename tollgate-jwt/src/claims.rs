// Identity claims carried by a session token

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The identity payload embedded in every session token.
///
/// Serialized with the registered JWT names (`sub`, `iat`, `exp`) plus
/// `org_id`. Roles and permissions are intentionally absent: they change
/// independently of the token and are resolved from the identity store on
/// every request. Unknown claims in a decoded payload are dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Opaque identifier of the authenticated principal
    #[serde(rename = "sub")]
    pub subject_id: String,

    /// Tenant scope; `None` means cross-tenant (superadmin) scope
    #[serde(rename = "org_id", default)]
    pub organization_id: Option<String>,

    /// Issue time (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl IdentityClaims {
    /// Build claims issued at `issued_at` that live for `lifetime_secs`.
    /// `exp` saturates at `i64::MAX` rather than wrapping.
    pub fn new(
        subject_id: impl Into<String>,
        organization_id: Option<String>,
        issued_at: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            organization_id,
            issued_at,
            expires_at: issued_at.saturating_add(lifetime_secs),
        }
    }

    /// Build claims issued now.
    pub fn issued_now(
        subject_id: impl Into<String>,
        organization_id: Option<String>,
        lifetime_secs: i64,
    ) -> Self {
        Self::new(
            subject_id,
            organization_id,
            Utc::now().timestamp(),
            lifetime_secs,
        )
    }

    /// Principal is not scoped to a single organization.
    pub fn is_superadmin(&self) -> bool {
        self.organization_id.is_none()
    }

    /// Seconds between issue and expiry.
    pub fn lifetime(&self) -> i64 {
        self.expires_at - self.issued_at
    }

    /// Expired at `now`, allowing `leeway` seconds past `exp`.
    pub fn is_expired_at(&self, now: i64, leeway: u64) -> bool {
        self.expires_at < now.saturating_sub(leeway as i64)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp(), 0)
    }
}
