// Authentication and authorization guards

use crate::{AuthError, IdentityStore, JwtStrategy, Principal, Result};
use http::HeaderMap;
use tollgate_jwt::IdentityClaims;
use tollgate_log::debug;

/// Authorization check applied to a resolved principal.
pub trait Guard: Send + Sync {
    fn check(&self, principal: &dyn Principal) -> Result<()>;
}

/// Outcome of a successful request authentication.
#[derive(Debug, Clone)]
pub struct Authenticated<P> {
    /// Claims as carried by the token
    pub claims: IdentityClaims,
    /// Principal as currently stored
    pub principal: P,
}

/// Full request gate: bearer token → claims → live principal → guards.
pub struct AuthGuard<S: IdentityStore> {
    strategy: JwtStrategy,
    store: S,
    guards: Vec<Box<dyn Guard>>,
}

impl<S: IdentityStore> AuthGuard<S> {
    pub fn new(strategy: JwtStrategy, store: S) -> Self {
        Self {
            strategy,
            store,
            guards: Vec::new(),
        }
    }

    /// Add an authorization check run after the principal is resolved
    pub fn with_guard(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Verify the request's bearer token without consulting the store.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<IdentityClaims> {
        self.strategy.authenticate_headers(headers)
    }

    /// Authenticate a request and authorize it against every guard.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Authenticated<S::Principal>> {
        let claims = self.authenticate(headers)?;
        let principal = self.resolve(&claims).await?;

        for guard in &self.guards {
            guard.check(&principal)?;
        }

        Ok(Authenticated { claims, principal })
    }

    /// Re-fetch the principal named by `claims` from the identity store.
    ///
    /// A subject that no longer exists is reported as an invalid token; a
    /// deactivated one as an inactive account.
    pub async fn resolve(&self, claims: &IdentityClaims) -> Result<S::Principal> {
        let principal = match self.store.find_principal(&claims.subject_id).await {
            Some(principal) => principal,
            None => {
                debug!("token subject not found"; subject = claims.subject_id);
                return Err(AuthError::invalid_token());
            }
        };

        if !principal.is_active() {
            debug!("inactive principal rejected"; subject = claims.subject_id);
            return Err(AuthError::account_inactive());
        }

        Ok(principal)
    }
}

/// Role-based authorization guard
#[derive(Debug, Clone)]
pub struct RoleGuard {
    required_roles: Vec<String>,
    require_all: bool,
}

impl RoleGuard {
    /// Require ANY of the roles
    pub fn any(roles: Vec<String>) -> Self {
        Self {
            required_roles: roles,
            require_all: false,
        }
    }

    /// Require ALL of the roles
    pub fn all(roles: Vec<String>) -> Self {
        Self {
            required_roles: roles,
            require_all: true,
        }
    }

    pub fn check_roles(&self, principal: &dyn Principal) -> bool {
        let role_refs: Vec<&str> = self.required_roles.iter().map(String::as_str).collect();

        if self.require_all {
            principal.has_all_roles(&role_refs)
        } else {
            principal.has_any_role(&role_refs)
        }
    }
}

impl Guard for RoleGuard {
    fn check(&self, principal: &dyn Principal) -> Result<()> {
        if self.check_roles(principal) {
            Ok(())
        } else {
            Err(AuthError::insufficient_permissions())
        }
    }
}

/// Permission-based authorization guard
#[derive(Debug, Clone)]
pub struct PermissionGuard {
    required_permissions: Vec<String>,
    require_all: bool,
}

impl PermissionGuard {
    /// Require ANY of the permissions
    pub fn any(permissions: Vec<String>) -> Self {
        Self {
            required_permissions: permissions,
            require_all: false,
        }
    }

    /// Require ALL of the permissions
    pub fn all(permissions: Vec<String>) -> Self {
        Self {
            required_permissions: permissions,
            require_all: true,
        }
    }

    pub fn check_permissions(&self, principal: &dyn Principal) -> bool {
        if self.require_all {
            self.required_permissions
                .iter()
                .all(|perm| principal.has_permission(perm))
        } else {
            self.required_permissions
                .iter()
                .any(|perm| principal.has_permission(perm))
        }
    }
}

impl Guard for PermissionGuard {
    fn check(&self, principal: &dyn Principal) -> Result<()> {
        if self.check_permissions(principal) {
            Ok(())
        } else {
            Err(AuthError::insufficient_permissions())
        }
    }
}

/// Restricts access to one organization's resources. Superadmins pass.
#[derive(Debug, Clone)]
pub struct OrganizationGuard {
    organization_id: String,
}

impl OrganizationGuard {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
        }
    }
}

impl Guard for OrganizationGuard {
    fn check(&self, principal: &dyn Principal) -> Result<()> {
        check_organization(principal, &self.organization_id)
    }
}

/// Allow `principal` to act on resources of `organization_id`.
pub fn check_organization(principal: &dyn Principal, organization_id: &str) -> Result<()> {
    match principal.organization_id() {
        None => Ok(()),
        Some(own) if own == organization_id => Ok(()),
        Some(_) => Err(AuthError::insufficient_permissions()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthErrorKind, UserContext};

    fn member() -> UserContext {
        UserContext::new("user123", Some("org-1".to_string()))
            .with_roles(vec!["admin".to_string(), "user".to_string()])
            .with_permissions(vec!["read".to_string(), "write".to_string()])
    }

    #[test]
    fn test_role_guard() {
        let user = member();

        assert!(RoleGuard::any(vec!["admin".to_string()]).check_roles(&user));
        assert!(!RoleGuard::any(vec!["guest".to_string()]).check_roles(&user));
        assert!(RoleGuard::all(vec!["admin".to_string(), "user".to_string()]).check_roles(&user));
        assert!(!RoleGuard::all(vec!["admin".to_string(), "guest".to_string()]).check_roles(&user));
    }

    #[test]
    fn test_permission_guard() {
        let user = member();

        assert!(PermissionGuard::any(vec!["read".to_string()]).check_permissions(&user));
        assert!(!PermissionGuard::any(vec!["delete".to_string()]).check_permissions(&user));
        assert!(
            PermissionGuard::all(vec!["read".to_string(), "write".to_string()])
                .check_permissions(&user)
        );
        assert!(
            !PermissionGuard::all(vec!["read".to_string(), "delete".to_string()])
                .check_permissions(&user)
        );
    }

    #[test]
    fn test_guard_failure_kind() {
        let err = RoleGuard::any(vec!["owner".to_string()])
            .check(&member())
            .unwrap_err();

        assert_eq!(err.kind(), AuthErrorKind::InsufficientPermissions);
        assert_eq!(err.status().as_u16(), 403);
    }

    #[test]
    fn test_organization_scope() {
        let user = member();
        let admin = UserContext::superadmin("admin-1");

        assert!(check_organization(&user, "org-1").is_ok());
        assert_eq!(
            check_organization(&user, "org-2").unwrap_err().kind(),
            AuthErrorKind::InsufficientPermissions
        );
        assert!(check_organization(&admin, "org-2").is_ok());
        assert!(OrganizationGuard::new("org-9").check(&admin).is_ok());
    }
}
