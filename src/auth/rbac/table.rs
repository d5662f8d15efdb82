//! Static role to permission table

use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

use super::catalog::{Action, Permission, Resource};
use super::roles::{ADMINISTRATOR, default_role_grants};
use crate::config::RbacConfig;
use crate::utils::error::{PlatformError, Result};

/// Immutable mapping from role name to the permissions it holds by default.
///
/// Built once at startup and shared behind an `Arc`; every entry is a member
/// of the permission catalog.
#[derive(Debug, Clone, Default)]
pub struct RolePermissionTable {
    roles: HashMap<String, HashSet<Permission>>,
}

impl RolePermissionTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the platform's default roles, `admin_role` holding the
    /// whole catalog.
    pub fn with_default_roles(admin_role: &str) -> Self {
        let mut table = Self::new();
        for (role, permissions) in default_role_grants(admin_role) {
            let valid: HashSet<Permission> = permissions
                .into_iter()
                .filter(|permission| {
                    let keep = permission.is_valid();
                    if !keep {
                        debug!(role, permission = %permission, "Dropping grant outside the catalog");
                    }
                    keep
                })
                .collect();
            table.roles.insert(role.to_string(), valid);
        }
        table
    }

    /// Add or replace a role.
    ///
    /// Fails without modifying the table when any permission is outside the catalog.
    pub fn insert_role<I>(&mut self, role: impl Into<String>, permissions: I) -> Result<()>
    where
        I: IntoIterator<Item = Permission>,
    {
        let role = role.into();
        if role.trim().is_empty() {
            return Err(PlatformError::validation("Role name cannot be empty"));
        }

        let permissions: HashSet<Permission> = permissions.into_iter().collect();
        if let Some(invalid) = permissions.iter().find(|p| !p.is_valid()) {
            warn!(role = %role, permission = %invalid, "Rejected role with invalid permission");
            return Err(PlatformError::validation(format!(
                "Permission {} is not valid for role {}",
                invalid, role
            )));
        }

        self.roles.insert(role, permissions);
        Ok(())
    }

    pub fn has_permission(&self, role: &str, resource: Resource, action: Action) -> bool {
        self.roles
            .get(role)
            .is_some_and(|permissions| permissions.contains(&Permission::new(resource, action)))
    }

    pub fn grants(&self, role: &str, permission: &Permission) -> bool {
        self.has_permission(role, permission.resource, permission.action)
    }

    /// Permissions held by `role`, sorted; empty for unknown roles.
    pub fn role_permissions(&self, role: &str) -> Vec<Permission> {
        let mut permissions: Vec<Permission> = self
            .roles
            .get(role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        permissions.sort();
        permissions
    }

    /// Role names, sorted
    pub fn roles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Permission count per role
    pub fn summary(&self) -> BTreeMap<String, usize> {
        self.roles
            .iter()
            .map(|(role, permissions)| (role.clone(), permissions.len()))
            .collect()
    }
}

/// Factory for the default table with the `Administrator` role.
pub fn default_roles() -> RolePermissionTable {
    RolePermissionTable::with_default_roles(ADMINISTRATOR)
}

/// Factory for the default table with the configured administrator role.
pub fn default_roles_for(config: &RbacConfig) -> RolePermissionTable {
    RolePermissionTable::with_default_roles(&config.admin_role)
}
