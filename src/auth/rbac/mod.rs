//! Role-Based Access Control (RBAC)
//!
//! Permission catalog, the static role table, the dynamic store and
//! ownership contracts, and the authorization guard built on them.

mod catalog;
mod guard;
mod ownership;
pub mod roles;
mod store;
mod table;

pub use catalog::{
    Action, Permission, PermissionParseError, Resource, all_permissions, is_valid_combination,
    parse_permission,
};
pub use guard::{AuthorizationGuard, Grant};
pub use ownership::{InMemoryOwnership, OwnershipRegistry, OwnershipResolver};
pub use store::{InMemoryPermissionStore, NoDynamicPermissions, PermissionStore, RoleRecord};
pub use table::{RolePermissionTable, default_roles, default_roles_for};
