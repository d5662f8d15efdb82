//! Authorization integration tests
//!
//! The guard over the default role table, an in-memory permission store and
//! in-memory ownership facts.

#[cfg(test)]
mod tests {
    use crate::common::PrincipalFactory;
    use std::sync::Arc;
    use ton_auth::auth::AuthError;
    use ton_auth::auth::rbac::roles::{
        ACCOUNTANT, ADMINISTRATOR, AREA_MANAGER, DRIVER, MECHANIC, SERVICE_ADVISOR,
        WAREHOUSE_STAFF,
    };
    use ton_auth::auth::rbac::{
        Action, AuthorizationGuard, Grant, InMemoryOwnership, InMemoryPermissionStore,
        OwnershipRegistry, Permission, Resource, RoleRecord, all_permissions, default_roles,
    };
    use ton_auth::config::RbacConfig;

    fn guard(store: Arc<InMemoryPermissionStore>) -> AuthorizationGuard {
        AuthorizationGuard::new(Arc::new(default_roles()), store, &RbacConfig::default())
    }

    fn p(resource: Resource, action: Action) -> Permission {
        Permission::new(resource, action)
    }

    #[tokio::test]
    async fn test_default_role_matrix() {
        let guard = guard(Arc::new(InMemoryPermissionStore::new()));
        let cases = [
            (ADMINISTRATOR, Resource::System, Action::Update, true),
            (ADMINISTRATOR, Resource::Vehicle, Action::Approve, false),
            (AREA_MANAGER, Resource::WorkOrder, Action::Approve, true),
            (AREA_MANAGER, Resource::WorkOrder, Action::Delete, false),
            (SERVICE_ADVISOR, Resource::Customer, Action::Create, true),
            (SERVICE_ADVISOR, Resource::Payment, Action::Create, false),
            (MECHANIC, Resource::WorkOrder, Action::Update, true),
            (MECHANIC, Resource::WorkOrder, Action::Assign, false),
            (WAREHOUSE_STAFF, Resource::StockMovement, Action::Create, true),
            (WAREHOUSE_STAFF, Resource::Inventory, Action::Create, false),
            (DRIVER, Resource::GpsData, Action::Read, true),
            (DRIVER, Resource::Vehicle, Action::Update, false),
            (ACCOUNTANT, Resource::Invoice, Action::Export, true),
            (ACCOUNTANT, Resource::Payment, Action::Export, false),
            (ACCOUNTANT, Resource::Inventory, Action::Update, false),
        ];

        for (role, resource, action, allowed) in cases {
            let principal = PrincipalFactory::with_role(1, role);
            let result = guard.require_permission(&principal, resource, action).await;
            assert_eq!(
                result.is_ok(),
                allowed,
                "{} {}:{} -> {:?}",
                role,
                resource,
                action,
                result
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_role_uses_only_stored_grants() {
        let store = Arc::new(InMemoryPermissionStore::new());
        store.assign_role(
            40,
            RoleRecord {
                id: 9,
                name: "Fleet Auditor".to_string(),
            },
        );
        store.grant_role_permission(9, p(Resource::AuditLog, Action::Read));
        let guard = guard(store);
        let auditor = PrincipalFactory::with_role(40, "Fleet Auditor");

        assert_eq!(
            guard
                .require_permission(&auditor, Resource::AuditLog, Action::Read)
                .await,
            Ok(Grant::Dynamic {
                role: Some("Fleet Auditor".to_string())
            })
        );
        assert!(
            guard
                .require_permission(&auditor, Resource::AuditLog, Action::Delete)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_direct_user_grant_extends_static_role() {
        let store = Arc::new(InMemoryPermissionStore::new());
        store.grant_user_permission(5, p(Resource::WorkOrder, Action::Assign));
        let guard = guard(store);
        let mechanic = PrincipalFactory::with_role(5, MECHANIC);
        let other_mechanic = PrincipalFactory::with_role(6, MECHANIC);

        assert_eq!(
            guard
                .require_permission(&mechanic, Resource::WorkOrder, Action::Assign)
                .await,
            Ok(Grant::Dynamic { role: None })
        );
        assert!(
            guard
                .require_permission(&other_mechanic, Resource::WorkOrder, Action::Assign)
                .await
                .is_err()
        );

        let effective = guard.effective_permissions(&mechanic).await.unwrap();
        assert!(effective.contains(&p(Resource::WorkOrder, Action::Assign)));
        assert!(effective.contains(&p(Resource::InventoryItem, Action::Read)));
    }

    #[tokio::test]
    async fn test_any_permission() {
        let guard = guard(Arc::new(InMemoryPermissionStore::new()));
        let driver = PrincipalFactory::with_role(3, DRIVER);

        let result = guard
            .require_any_permission(
                &driver,
                &[
                    p(Resource::WorkOrder, Action::Approve),
                    p(Resource::Telematics, Action::Read),
                ],
            )
            .await;
        assert_eq!(
            result,
            Ok(Grant::Static {
                role: DRIVER.to_string()
            })
        );

        let err = guard
            .require_any_permission(
                &driver,
                &[
                    p(Resource::WorkOrder, Action::Approve),
                    p(Resource::Invoice, Action::Read),
                ],
            )
            .await
            .unwrap_err();
        match err {
            AuthError::InsufficientPermission { required, .. } => assert_eq!(required.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ownership_with_admin_bypass() {
        let work_orders = Arc::new(InMemoryOwnership::new());
        work_orders.insert(7, 1001);
        let guard = guard(Arc::new(InMemoryPermissionStore::new()))
            .with_ownership(OwnershipRegistry::new().with(Resource::WorkOrder, work_orders));

        let mechanic = PrincipalFactory::with_role(7, MECHANIC);
        let colleague = PrincipalFactory::with_role(8, MECHANIC);
        let admin = PrincipalFactory::with_role(1, ADMINISTRATOR);

        assert_eq!(
            guard.require_resource_owner(&mechanic, "work_order", 1001).await,
            Ok(Grant::Owner)
        );
        assert_eq!(
            guard
                .require_resource_owner(&colleague, "work_order", 1001)
                .await
                .unwrap_err()
                .code(),
            "resource_access_denied"
        );
        assert_eq!(
            guard.require_resource_owner(&admin, "work_order", 1001).await,
            Ok(Grant::Administrator)
        );
        assert_eq!(
            guard.require_resource_owner(&admin, "spaceship", 1).await,
            Ok(Grant::Administrator)
        );
    }

    #[tokio::test]
    async fn test_unsupported_resource_types() {
        let guard = guard(Arc::new(InMemoryPermissionStore::new()));
        let mechanic = PrincipalFactory::with_role(7, MECHANIC);

        assert_eq!(
            guard.require_resource_owner(&mechanic, "spaceship", 1).await,
            Err(AuthError::UnsupportedResourceType("spaceship".to_string()))
        );
        // Known resource, but no ownership rule registered
        assert!(matches!(
            guard.require_resource_owner(&mechanic, "invoice", 1).await,
            Err(AuthError::UnsupportedResourceType(_))
        ));
    }

    #[tokio::test]
    async fn test_administrator_holds_whole_catalog() {
        let guard = guard(Arc::new(InMemoryPermissionStore::new()));
        let admin = PrincipalFactory::with_role(1, ADMINISTRATOR);

        let effective = guard.effective_permissions(&admin).await.unwrap();
        assert_eq!(effective, all_permissions());
    }

    #[test]
    fn test_require_role() {
        let guard = guard(Arc::new(InMemoryPermissionStore::new()));
        let accountant = PrincipalFactory::with_role(2, ACCOUNTANT);

        assert!(guard.require_role(&accountant, &[ACCOUNTANT, ADMINISTRATOR]).is_ok());
        let err = guard.require_role(&accountant, &[ADMINISTRATOR]).unwrap_err();
        assert_eq!(err.code(), "insufficient_permissions");
    }
}
