// Principal traits and context

use serde::{Deserialize, Serialize};

/// An authenticated principal as currently known to the identity store.
///
/// Role, permission and active-status answers must reflect the store at
/// request time; they are never derived from token claims.
pub trait Principal: Send + Sync {
    fn subject_id(&self) -> &str;

    /// Tenant the principal belongs to; `None` for cross-tenant principals
    fn organization_id(&self) -> Option<&str>;

    fn is_active(&self) -> bool {
        true
    }

    fn has_role(&self, role: &str) -> bool;

    fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    fn has_all_roles(&self, roles: &[&str]) -> bool {
        roles.iter().all(|role| self.has_role(role))
    }

    fn has_permission(&self, permission: &str) -> bool;

    /// Not scoped to a single organization
    fn is_superadmin(&self) -> bool {
        self.organization_id().is_none()
    }
}

/// Plain principal record, suitable for most identity stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,

    pub organization_id: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub permissions: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl UserContext {
    /// Active principal in `organization_id` with no roles
    pub fn new(user_id: impl Into<String>, organization_id: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            organization_id,
            active: true,
            roles: Vec::new(),
            permissions: Vec::new(),
        }
    }

    /// Cross-tenant principal
    pub fn superadmin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, None)
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

impl Principal for UserContext {
    fn subject_id(&self) -> &str {
        &self.user_id
    }

    fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}
