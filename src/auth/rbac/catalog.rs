//! Permission catalog
//!
//! The permission universe is every `(Resource, Action)` pair accepted by the
//! validity table below. Resources absent from the table accept every action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Protectable entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    User,
    Role,
    Permission,
    Vehicle,
    VehicleType,
    VehicleStatus,
    WorkOrder,
    WorkOrderItem,
    ServiceType,
    Inventory,
    Warehouse,
    InventoryItem,
    StockMovement,
    Invoice,
    InvoiceItem,
    Payment,
    PaymentMethod,
    Customer,
    CustomerVehicle,
    Telematics,
    GpsData,
    Diagnostics,
    Report,
    Analytics,
    Dashboard,
    System,
    Config,
    AuditLog,
}

impl Resource {
    pub const ALL: [Resource; 28] = [
        Resource::User,
        Resource::Role,
        Resource::Permission,
        Resource::Vehicle,
        Resource::VehicleType,
        Resource::VehicleStatus,
        Resource::WorkOrder,
        Resource::WorkOrderItem,
        Resource::ServiceType,
        Resource::Inventory,
        Resource::Warehouse,
        Resource::InventoryItem,
        Resource::StockMovement,
        Resource::Invoice,
        Resource::InvoiceItem,
        Resource::Payment,
        Resource::PaymentMethod,
        Resource::Customer,
        Resource::CustomerVehicle,
        Resource::Telematics,
        Resource::GpsData,
        Resource::Diagnostics,
        Resource::Report,
        Resource::Analytics,
        Resource::Dashboard,
        Resource::System,
        Resource::Config,
        Resource::AuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::User => "user",
            Resource::Role => "role",
            Resource::Permission => "permission",
            Resource::Vehicle => "vehicle",
            Resource::VehicleType => "vehicle_type",
            Resource::VehicleStatus => "vehicle_status",
            Resource::WorkOrder => "work_order",
            Resource::WorkOrderItem => "work_order_item",
            Resource::ServiceType => "service_type",
            Resource::Inventory => "inventory",
            Resource::Warehouse => "warehouse",
            Resource::InventoryItem => "inventory_item",
            Resource::StockMovement => "stock_movement",
            Resource::Invoice => "invoice",
            Resource::InvoiceItem => "invoice_item",
            Resource::Payment => "payment",
            Resource::PaymentMethod => "payment_method",
            Resource::Customer => "customer",
            Resource::CustomerVehicle => "customer_vehicle",
            Resource::Telematics => "telematics",
            Resource::GpsData => "gps_data",
            Resource::Diagnostics => "diagnostics",
            Resource::Report => "report",
            Resource::Analytics => "analytics",
            Resource::Dashboard => "dashboard",
            Resource::System => "system",
            Resource::Config => "config",
            Resource::AuditLog => "audit_log",
        }
    }

    /// Actions this resource supports.
    pub fn supported_actions(&self) -> &'static [Action] {
        VALID_ACTIONS
            .iter()
            .find(|(resource, _)| resource == self)
            .map(|(_, actions)| *actions)
            .unwrap_or(&Action::ALL)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| PermissionParseError::UnknownResource(s.to_string()))
    }
}

/// Operation on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
    Export,
    Import,
    Approve,
    Reject,
    Assign,
    Unassign,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::List,
        Action::Export,
        Action::Import,
        Action::Approve,
        Action::Reject,
        Action::Assign,
        Action::Unassign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::List => "list",
            Action::Export => "export",
            Action::Import => "import",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Assign => "assign",
            Action::Unassign => "unassign",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| PermissionParseError::UnknownAction(s.to_string()))
    }
}

/// Per-resource action restrictions.
const VALID_ACTIONS: &[(Resource, &[Action])] = &[
    (
        Resource::Vehicle,
        &[
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::List,
            Action::Export,
        ],
    ),
    (
        Resource::WorkOrder,
        &[
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::List,
            Action::Assign,
            Action::Approve,
            Action::Reject,
        ],
    ),
    (
        Resource::Inventory,
        &[
            Action::Read,
            Action::Update,
            Action::List,
            Action::Import,
            Action::Export,
        ],
    ),
    (
        Resource::Payment,
        &[Action::Create, Action::Read, Action::List],
    ),
    (
        Resource::System,
        &[Action::Read, Action::Update, Action::List],
    ),
    (
        Resource::Report,
        &[Action::Read, Action::List, Action::Export],
    ),
    (Resource::Dashboard, &[Action::Read]),
];

/// Error parsing a `resource:action` string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionParseError {
    #[error("invalid permission format: {0}")]
    Format(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// A `(Resource, Action)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Whether this pair belongs to the catalog.
    pub fn is_valid(&self) -> bool {
        is_valid_combination(self.resource, self.action)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for Permission {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(resource), Some(action), None) => Ok(Self {
                resource: resource.parse()?,
                action: action.parse()?,
            }),
            _ => Err(PermissionParseError::Format(s.to_string())),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}

/// Parse the canonical `resource:action` form.
pub fn parse_permission(s: &str) -> Result<Permission, PermissionParseError> {
    s.parse()
}

/// Whether `action` is meaningful for `resource`.
pub fn is_valid_combination(resource: Resource, action: Action) -> bool {
    resource.supported_actions().contains(&action)
}

/// Every valid permission, in `(resource, action)` order.
pub fn all_permissions() -> BTreeSet<Permission> {
    Resource::ALL
        .iter()
        .flat_map(|resource| {
            resource
                .supported_actions()
                .iter()
                .map(move |action| Permission::new(*resource, *action))
        })
        .collect()
}
