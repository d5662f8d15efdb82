//! Request-time authorization decisions
//!
//! Each check consults the static role table first and falls back to the
//! dynamic permission store only on a miss. Store and ownership calls are
//! bounded by the configured lookup timeout; a timeout never allows.

use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::{Action, Permission, Resource};
use super::ownership::OwnershipRegistry;
use super::store::PermissionStore;
use super::table::RolePermissionTable;
use crate::auth::error::{AuthError, LookupFailure, RoleIssue};
use crate::auth::principal::Principal;
use crate::config::RbacConfig;
use crate::utils::error::{PlatformError, Result as PlatformResult};

const MAX_ROLE_LEN: usize = 64;

/// Why a check allowed the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Grant {
    /// The principal's role holds the permission in the static table
    Static { role: String },
    /// A persisted grant; `role` is `None` for a direct per-user grant
    Dynamic { role: Option<String> },
    /// Ownership bypass for the administrator role
    Administrator,
    /// The principal owns the resource instance
    Owner,
}

/// Permissions loaded from the dynamic store for one check
#[derive(Debug, Default)]
struct DynamicGrants {
    direct: HashSet<Permission>,
    by_role: Vec<(String, HashSet<Permission>)>,
    skipped_roles: usize,
}

impl DynamicGrants {
    fn find(&self, permission: &Permission) -> Option<Grant> {
        if self.direct.contains(permission) {
            return Some(Grant::Dynamic { role: None });
        }
        self.by_role
            .iter()
            .find(|(_, granted)| granted.contains(permission))
            .map(|(role, _)| Grant::Dynamic {
                role: Some(role.clone()),
            })
    }

    fn all(&self) -> impl Iterator<Item = &Permission> {
        self.direct
            .iter()
            .chain(self.by_role.iter().flat_map(|(_, granted)| granted.iter()))
    }
}

/// Authorization guard shared by all request handlers
#[derive(Clone)]
pub struct AuthorizationGuard {
    table: Arc<RolePermissionTable>,
    store: Arc<dyn PermissionStore>,
    ownership: Arc<OwnershipRegistry>,
    admin_role: String,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for AuthorizationGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGuard")
            .field("roles", &self.table.roles())
            .field("ownership", &self.ownership)
            .field("admin_role", &self.admin_role)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl AuthorizationGuard {
    pub fn new(
        table: Arc<RolePermissionTable>,
        store: Arc<dyn PermissionStore>,
        config: &RbacConfig,
    ) -> Self {
        if !table.contains_role(&config.admin_role) {
            warn!(
                admin_role = %config.admin_role,
                "Administrator role is missing from the role table"
            );
        }
        Self {
            table,
            store,
            ownership: Arc::new(OwnershipRegistry::new()),
            admin_role: config.admin_role.clone(),
            lookup_timeout: config.lookup_timeout(),
        }
    }

    pub fn with_ownership(mut self, ownership: OwnershipRegistry) -> Self {
        self.ownership = Arc::new(ownership);
        self
    }

    pub fn table(&self) -> &RolePermissionTable {
        &self.table
    }

    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    /// Allow when the principal holds `resource:action`
    pub async fn require_permission(
        &self,
        principal: &Principal,
        resource: Resource,
        action: Action,
    ) -> Result<Grant, AuthError> {
        let role = resolve_role(principal)?;
        let permission = Permission::new(resource, action);

        if self.table.grants(role, &permission) {
            debug!(
                user_id = principal.user_id,
                role,
                permission = %permission,
                "Permission granted by role"
            );
            return Ok(Grant::Static {
                role: role.to_string(),
            });
        }

        let dynamic = self.load_dynamic(principal.user_id).await?;
        if let Some(grant) = dynamic.find(&permission) {
            debug!(
                user_id = principal.user_id,
                role,
                permission = %permission,
                "Permission granted by stored grant"
            );
            return Ok(grant);
        }

        warn!(
            user_id = principal.user_id,
            role,
            resource = %resource,
            action = %action,
            skipped_roles = dynamic.skipped_roles,
            "Permission denied"
        );
        Err(AuthError::InsufficientPermission {
            role: role.to_string(),
            required: vec![permission],
        })
    }

    /// Allow when the principal holds at least one of `permissions`.
    ///
    /// Every listed permission is tried against the static table before the
    /// dynamic store is read, and the store is read at most once.
    pub async fn require_any_permission(
        &self,
        principal: &Principal,
        permissions: &[Permission],
    ) -> Result<Grant, AuthError> {
        let role = resolve_role(principal)?;

        if let Some(permission) = permissions.iter().find(|p| self.table.grants(role, p)) {
            debug!(
                user_id = principal.user_id,
                role,
                permission = %permission,
                "Permission granted by role"
            );
            return Ok(Grant::Static {
                role: role.to_string(),
            });
        }

        if !permissions.is_empty() {
            let dynamic = self.load_dynamic(principal.user_id).await?;
            if let Some(grant) = permissions.iter().find_map(|p| dynamic.find(p)) {
                debug!(
                    user_id = principal.user_id,
                    role,
                    "Permission granted by stored grant"
                );
                return Ok(grant);
            }
        }

        warn!(
            user_id = principal.user_id,
            role,
            required = ?permissions.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "No listed permission held"
        );
        Err(AuthError::InsufficientPermission {
            role: role.to_string(),
            required: permissions.to_vec(),
        })
    }

    /// Allow administrators, or the owner of `resource_type` instance `resource_id`
    pub async fn require_resource_owner(
        &self,
        principal: &Principal,
        resource_type: &str,
        resource_id: u64,
    ) -> Result<Grant, AuthError> {
        let role = resolve_role(principal)?;
        if role == self.admin_role {
            debug!(user_id = principal.user_id, resource_type, resource_id, "Ownership bypassed");
            return Ok(Grant::Administrator);
        }

        let resource: Resource = resource_type
            .parse()
            .map_err(|_| AuthError::UnsupportedResourceType(resource_type.to_string()))?;
        self.check_owner(principal, resource, resource_id).await
    }

    /// Typed form of [`require_resource_owner`](Self::require_resource_owner)
    pub async fn require_owner_of(
        &self,
        principal: &Principal,
        resource: Resource,
        resource_id: u64,
    ) -> Result<Grant, AuthError> {
        let role = resolve_role(principal)?;
        if role == self.admin_role {
            debug!(user_id = principal.user_id, resource = %resource, resource_id, "Ownership bypassed");
            return Ok(Grant::Administrator);
        }
        self.check_owner(principal, resource, resource_id).await
    }

    /// Ownership lookup for a non-administrator
    async fn check_owner(
        &self,
        principal: &Principal,
        resource: Resource,
        resource_id: u64,
    ) -> Result<Grant, AuthError> {
        let resolver = self.ownership.resolver(resource).ok_or_else(|| {
            warn!(resource = %resource, "No ownership rule for resource type");
            AuthError::UnsupportedResourceType(resource.to_string())
        })?;

        let owned = self
            .bounded(resolver.is_owner(principal.user_id, resource_id))
            .await
            .map_err(|failure| {
                warn!(
                    user_id = principal.user_id,
                    resource = %resource,
                    resource_id,
                    ?failure,
                    "Ownership lookup failed"
                );
                AuthError::PermissionCheckFailed(failure)
            })?;

        if owned {
            debug!(user_id = principal.user_id, resource = %resource, resource_id, "Owner access");
            Ok(Grant::Owner)
        } else {
            warn!(
                user_id = principal.user_id,
                resource = %resource,
                resource_id,
                "Ownership denied"
            );
            Err(AuthError::OwnershipDenied {
                resource_type: resource,
                resource_id,
            })
        }
    }

    /// Allow when the principal's role is one of `allowed`
    pub fn require_role(&self, principal: &Principal, allowed: &[&str]) -> Result<(), AuthError> {
        let role = resolve_role(principal)?;
        if allowed.contains(&role) {
            debug!(user_id = principal.user_id, role, "Role authorization passed");
            return Ok(());
        }

        warn!(user_id = principal.user_id, role, ?allowed, "Role not allowed");
        Err(AuthError::RoleNotAllowed {
            role: role.to_string(),
            allowed: allowed.iter().map(|r| r.to_string()).collect(),
        })
    }

    /// Static and stored permissions of the principal, sorted
    pub async fn effective_permissions(
        &self,
        principal: &Principal,
    ) -> Result<BTreeSet<Permission>, AuthError> {
        let role = resolve_role(principal)?;
        let mut permissions: BTreeSet<Permission> =
            self.table.role_permissions(role).into_iter().collect();
        let dynamic = self.load_dynamic(principal.user_id).await?;
        permissions.extend(dynamic.all().copied());
        Ok(permissions)
    }

    async fn load_dynamic(&self, user_id: u64) -> Result<DynamicGrants, AuthError> {
        self.bounded(async {
            let mut grants = DynamicGrants {
                direct: parse_grants(self.store.user_permissions(user_id).await?, None),
                ..DynamicGrants::default()
            };

            for role in self.store.user_roles(user_id).await? {
                match self.store.role_permissions(role.id).await {
                    Ok(raw) => {
                        let granted = parse_grants(raw, Some(role.name.as_str()));
                        grants.by_role.push((role.name, granted));
                    }
                    Err(e) => {
                        warn!(
                            user_id,
                            role_id = role.id,
                            role = %role.name,
                            "Skipping role after permission lookup failure: {}",
                            e
                        );
                        grants.skipped_roles += 1;
                    }
                }
            }

            Ok::<_, PlatformError>(grants)
        })
        .await
        .map_err(|failure| {
            warn!(user_id, ?failure, "Dynamic permission lookup failed");
            AuthError::PermissionCheckFailed(failure)
        })
    }

    async fn bounded<T, F>(&self, lookup: F) -> Result<T, LookupFailure>
    where
        F: Future<Output = PlatformResult<T>>,
    {
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(LookupFailure::Store(e.to_string())),
            Err(_) => Err(LookupFailure::TimedOut {
                after_ms: self.lookup_timeout.as_millis() as u64,
            }),
        }
    }
}

/// Validate the principal's role value
fn resolve_role(principal: &Principal) -> Result<&str, AuthError> {
    let role = principal.role.trim();
    if role.is_empty() {
        return Err(AuthError::RoleUnresolved(RoleIssue::Missing));
    }
    let well_formed = role.len() <= MAX_ROLE_LEN
        && role
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'));
    if !well_formed {
        return Err(AuthError::RoleUnresolved(RoleIssue::InvalidFormat));
    }
    Ok(role)
}

/// Parse stored permission strings, dropping anything outside the catalog
fn parse_grants(raw: Vec<String>, role: Option<&str>) -> HashSet<Permission> {
    raw.into_iter()
        .filter_map(|value| match value.parse::<Permission>() {
            Ok(permission) if permission.is_valid() => Some(permission),
            Ok(permission) => {
                warn!(role, permission = %permission, "Ignoring stored grant outside the catalog");
                None
            }
            Err(e) => {
                warn!(role, value = %value, "Ignoring unparseable stored grant: {}", e);
                None
            }
        })
        .collect()
}
