//! Default role definitions

use super::catalog::{Action, Permission, Resource, all_permissions};

pub const ADMINISTRATOR: &str = "Administrator";
pub const AREA_MANAGER: &str = "Area Manager";
pub const SERVICE_ADVISOR: &str = "Service Advisor";
pub const MECHANIC: &str = "Mechanic";
pub const WAREHOUSE_STAFF: &str = "Warehouse Staff";
pub const DRIVER: &str = "Driver";
pub const ACCOUNTANT: &str = "Accountant";

/// Role name and its default grants, the administrator role first.
///
/// `admin_role` names the role that holds the whole catalog. Some listed
/// grants fall outside the catalog (for example `inventory:create`); the
/// table drops them at construction.
pub fn default_role_grants(admin_role: &str) -> Vec<(&str, Vec<Permission>)> {
    use Action::*;
    use Resource as R;

    vec![
        (admin_role, all_permissions().into_iter().collect()),
        (
            AREA_MANAGER,
            grants(&[
                (R::User, &[Read, List, Update]),
                (R::Vehicle, &[Create, Read, Update, Delete, List, Export]),
                (
                    R::WorkOrder,
                    &[Create, Read, Update, List, Assign, Approve, Reject],
                ),
                (R::Inventory, &[Read, Update, List, Import, Export]),
                (R::Report, &[Read, List, Export]),
                (R::Dashboard, &[Read]),
            ]),
        ),
        (
            SERVICE_ADVISOR,
            grants(&[
                (R::Vehicle, &[Read, Update, List]),
                (R::WorkOrder, &[Create, Read, Update, List]),
                (R::WorkOrderItem, &[Create, Read, Update, Delete]),
                (R::Customer, &[Create, Read, Update, List]),
                (R::CustomerVehicle, &[Create, Read, Update]),
                (R::Invoice, &[Create, Read, Update, List]),
            ]),
        ),
        (
            MECHANIC,
            grants(&[
                (R::Vehicle, &[Read, Update, List]),
                (R::WorkOrder, &[Read, Update, List]),
                (R::WorkOrderItem, &[Read, Update]),
                (R::Inventory, &[Read, List]),
                (R::InventoryItem, &[Read]),
            ]),
        ),
        (
            WAREHOUSE_STAFF,
            grants(&[
                (R::Inventory, &[Create, Read, Update, Delete, List]),
                (R::InventoryItem, &[Create, Read, Update, Delete, List]),
                (R::StockMovement, &[Create, Read, List]),
                (R::Warehouse, &[Read, Update, List]),
            ]),
        ),
        (
            DRIVER,
            grants(&[
                (R::Vehicle, &[Read, List]),
                (R::WorkOrder, &[Read, List]),
                (R::Telematics, &[Read]),
                (R::GpsData, &[Read]),
                (R::Diagnostics, &[Read]),
            ]),
        ),
        (
            ACCOUNTANT,
            grants(&[
                (R::Invoice, &[Create, Read, Update, List, Export]),
                (R::Payment, &[Create, Read, List, Export]),
                (R::PaymentMethod, &[Read, List]),
                (R::Report, &[Read, List, Export]),
                (R::Customer, &[Read, List]),
            ]),
        ),
    ]
}

fn grants(pairs: &[(Resource, &[Action])]) -> Vec<Permission> {
    pairs
        .iter()
        .flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |action| Permission::new(*resource, *action))
        })
        .collect()
}
