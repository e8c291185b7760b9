//! Authentication and authorization for Tollgate.
//!
//! Turns codec outcomes and authorization decisions into one closed error
//! taxonomy ([`AuthErrorKind`]) with a fixed HTTP mapping, and provides the
//! boundary pieces around it: bearer extraction, principal resolution,
//! guards and login.

pub mod error;
pub mod guard;
pub mod password;
pub mod response;
pub mod store;
pub mod strategy;
pub mod user;

pub use error::{AuthError, AuthErrorKind, BEARER_CHALLENGE, Result};
pub use guard::{
    AuthGuard, Authenticated, Guard, OrganizationGuard, PermissionGuard, RoleGuard,
    check_organization,
};
pub use password::{HashAlgorithm, PasswordError, PasswordHasher};
pub use response::ErrorResponse;
pub use store::{CredentialStore, IdentityStore, StoredCredentials};
pub use strategy::{JwtStrategy, extract_bearer};
pub use user::{Principal, UserContext};

use std::sync::Arc;
use thiserror::Error;
use tollgate_jwt::{AccessToken, JwtError, JwtService};
use tollgate_log::{debug, info, warn};

/// Why a login attempt produced no token.
#[derive(Error, Debug)]
pub enum LoginError {
    /// Rejected; render with [`AuthError::into_http_response`]
    #[error(transparent)]
    Rejected(#[from] AuthError),

    /// Credentials were fine but the token could not be signed
    #[error("Token issuance failed: {0}")]
    Issuance(#[from] JwtError),
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    jwt: Arc<JwtService>,
    password_hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(jwt: JwtService) -> Self {
        Self {
            jwt: Arc::new(jwt),
            password_hasher: PasswordHasher::default(),
        }
    }

    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.password_hasher = hasher;
        self
    }

    pub fn hash_password(&self, password: &str) -> std::result::Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a login/password pair and issue an access token.
    ///
    /// Unknown logins and wrong passwords both yield `InvalidCredentials`.
    /// The active flag is only consulted once the password matched, so an
    /// `AccountInactive` answer never reveals anything to a guesser.
    pub async fn login<C: CredentialStore + ?Sized>(
        &self,
        store: &C,
        login: &str,
        password: &str,
    ) -> std::result::Result<AccessToken, LoginError> {
        let Some(credentials) = store.find_credentials(login).await else {
            debug!("login rejected"; reason = "unknown login");
            return Err(AuthError::invalid_credentials().into());
        };

        let matches = match self.password_hasher.verify(password, &credentials.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("login rejected"; subject = credentials.subject_id, reason = e);
                false
            }
        };
        if !matches {
            debug!("login rejected"; subject = credentials.subject_id, reason = "wrong password");
            return Err(AuthError::invalid_credentials().into());
        }

        if !credentials.active {
            debug!("login rejected"; subject = credentials.subject_id, reason = "inactive");
            return Err(AuthError::account_inactive().into());
        }

        let token = self.jwt.issue_token(
            &credentials.subject_id,
            credentials.organization_id.as_deref(),
        )?;
        info!("login succeeded"; subject = credentials.subject_id);

        Ok(token)
    }

    /// Bearer strategy sharing this service's codec
    pub fn strategy(&self) -> JwtStrategy {
        JwtStrategy::new(Arc::clone(&self.jwt))
    }

    /// Request gate backed by `store`
    pub fn guard<S: IdentityStore>(&self, store: S) -> AuthGuard<S> {
        AuthGuard::new(self.strategy(), store)
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
