// Tollgate - stateless session tokens and bearer authentication
//
// Re-exports the workspace crates behind feature flags, plus a prelude with
// the types most request handlers need.

pub use tollgate_log as log;

#[cfg(feature = "jwt")]
pub use tollgate_jwt;

#[cfg(feature = "auth")]
pub use tollgate_auth;

// Prelude for common imports
pub mod prelude {
    #[cfg(feature = "jwt")]
    pub use tollgate_jwt::{
        AccessToken, Algorithm, IdentityClaims, JwtConfig, JwtError, JwtService,
    };

    #[cfg(feature = "auth")]
    pub use tollgate_auth::{
        AuthError, AuthErrorKind, AuthGuard, AuthService, Authenticated, CredentialStore,
        ErrorResponse, Guard, IdentityStore, JwtStrategy, LoginError, OrganizationGuard,
        PermissionGuard, Principal, RoleGuard, StoredCredentials, UserContext, extract_bearer,
    };
}
