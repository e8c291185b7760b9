// Interfaces to the authoritative identity store

use crate::Principal;
use async_trait::async_trait;
use std::sync::Arc;

/// Lookup of the live principal behind a token's subject.
///
/// Called on every authenticated request, so that deactivation and role
/// changes apply immediately rather than at token expiry. Results must not
/// be cached from the token.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    type Principal: Principal;

    /// `None` when the subject no longer exists
    async fn find_principal(&self, subject_id: &str) -> Option<Self::Principal>;
}

#[async_trait]
impl<S: IdentityStore + ?Sized> IdentityStore for Arc<S> {
    type Principal = S::Principal;

    async fn find_principal(&self, subject_id: &str) -> Option<Self::Principal> {
        (**self).find_principal(subject_id).await
    }
}

/// What login needs to know about an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub subject_id: String,
    pub organization_id: Option<String>,
    /// Argon2 or bcrypt PHC string
    pub password_hash: String,
    pub active: bool,
}

/// Lookup of stored credentials by login name.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credentials(&self, login: &str) -> Option<StoredCredentials>;
}
