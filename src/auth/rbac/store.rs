//! Dynamic permission store contract
//!
//! Per-user and per-role permission records persisted outside this crate.
//! Permission values are canonical `resource:action` strings.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::catalog::Permission;
use crate::utils::error::Result;

/// A role assigned to a user in the backing store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: u64,
    pub name: String,
}

/// Source of persisted permission grants.
///
/// Implementations report failures as [`PlatformError`](crate::utils::error::PlatformError);
/// the guard bounds every call with its lookup timeout.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Roles assigned to the user
    async fn user_roles(&self, user_id: u64) -> Result<Vec<RoleRecord>>;

    /// Permission strings granted to the role
    async fn role_permissions(&self, role_id: u64) -> Result<Vec<String>>;

    /// Permission strings granted directly to the user
    async fn user_permissions(&self, _user_id: u64) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Store that never grants anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDynamicPermissions;

#[async_trait]
impl PermissionStore for NoDynamicPermissions {
    async fn user_roles(&self, _user_id: u64) -> Result<Vec<RoleRecord>> {
        Ok(Vec::new())
    }

    async fn role_permissions(&self, _role_id: u64) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// In-memory store for tests and tooling
#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    user_roles: DashMap<u64, Vec<RoleRecord>>,
    role_permissions: DashMap<u64, Vec<String>>,
    user_permissions: DashMap<u64, Vec<String>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_role(&self, user_id: u64, role: RoleRecord) {
        let mut roles = self.user_roles.entry(user_id).or_default();
        if !roles.contains(&role) {
            roles.push(role);
        }
    }

    pub fn grant_role_permission(&self, role_id: u64, permission: Permission) {
        self.role_permissions
            .entry(role_id)
            .or_default()
            .push(permission.to_string());
    }

    pub fn grant_user_permission(&self, user_id: u64, permission: Permission) {
        self.user_permissions
            .entry(user_id)
            .or_default()
            .push(permission.to_string());
    }

    /// Store a raw record, bypassing parsing.
    pub fn grant_raw_role_permission(&self, role_id: u64, permission: impl Into<String>) {
        self.role_permissions
            .entry(role_id)
            .or_default()
            .push(permission.into());
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn user_roles(&self, user_id: u64) -> Result<Vec<RoleRecord>> {
        Ok(self
            .user_roles
            .get(&user_id)
            .map(|roles| roles.clone())
            .unwrap_or_default())
    }

    async fn role_permissions(&self, role_id: u64) -> Result<Vec<String>> {
        Ok(self
            .role_permissions
            .get(&role_id)
            .map(|permissions| permissions.clone())
            .unwrap_or_default())
    }

    async fn user_permissions(&self, user_id: u64) -> Result<Vec<String>> {
        Ok(self
            .user_permissions
            .get(&user_id)
            .map(|permissions| permissions.clone())
            .unwrap_or_default())
    }
}
