//! Core authentication system

use std::sync::Arc;

use tracing::{debug, info};

use super::bearer::extract_bearer;
use super::error::AuthError;
use super::jwt::{TokenService, TokenType};
use super::principal::Principal;
use super::rbac::{
    Action, AuthorizationGuard, Grant, OwnershipRegistry, Permission, PermissionStore, Resource,
    RolePermissionTable, default_roles_for,
};
use crate::config::AuthConfig;
use crate::utils::error::Result;

/// Main authentication system
#[derive(Clone, Debug)]
pub struct AuthSystem {
    /// Authentication configuration
    config: Arc<AuthConfig>,
    /// Token service
    tokens: Arc<TokenService>,
    /// Authorization guard
    guard: AuthorizationGuard,
}

impl AuthSystem {
    /// Create an authentication system over the default role table.
    ///
    /// The configured administrator role holds the whole catalog.
    pub fn new(config: &AuthConfig, store: Arc<dyn PermissionStore>) -> Result<Self> {
        Self::with_table(config, default_roles_for(&config.rbac), store)
    }

    /// Create an authentication system over an explicit role table
    pub fn with_table(
        config: &AuthConfig,
        table: RolePermissionTable,
        store: Arc<dyn PermissionStore>,
    ) -> Result<Self> {
        info!("Initializing authentication system");

        let tokens = Arc::new(TokenService::new(config)?);
        let guard = AuthorizationGuard::new(Arc::new(table), store, &config.rbac);

        info!(
            roles = guard.table().roles().len(),
            issuer = %tokens.issuer(),
            "Authentication system initialized"
        );
        Ok(Self::from_parts(config, tokens, guard))
    }

    /// Assemble from already-built parts
    pub fn from_parts(
        config: &AuthConfig,
        tokens: Arc<TokenService>,
        guard: AuthorizationGuard,
    ) -> Self {
        Self {
            config: Arc::new(config.clone()),
            tokens,
            guard,
        }
    }

    pub fn with_ownership(mut self, ownership: OwnershipRegistry) -> Self {
        self.guard = self.guard.with_ownership(ownership);
        self
    }

    /// Resolve an `Authorization` header value into a principal.
    ///
    /// Only access tokens are accepted.
    pub fn authenticate(&self, header: Option<&str>) -> std::result::Result<Principal, AuthError> {
        let token = extract_bearer(header)?;
        let claims = self.tokens.validate_as(token, TokenType::Access)?;
        debug!(user_id = claims.user_id, role = %claims.role, "Request authenticated");
        Ok(Principal::from(claims))
    }

    /// Like [`authenticate`](Self::authenticate), but any failure yields `None`
    pub fn authenticate_optional(&self, header: Option<&str>) -> Option<Principal> {
        header?;
        match self.authenticate(header) {
            Ok(principal) => Some(principal),
            Err(e) => {
                debug!(code = e.code(), "Continuing without an identity");
                None
            }
        }
    }

    pub async fn authorize(
        &self,
        principal: &Principal,
        resource: Resource,
        action: Action,
    ) -> std::result::Result<Grant, AuthError> {
        self.guard.require_permission(principal, resource, action).await
    }

    pub async fn authorize_any(
        &self,
        principal: &Principal,
        permissions: &[Permission],
    ) -> std::result::Result<Grant, AuthError> {
        self.guard.require_any_permission(principal, permissions).await
    }

    pub async fn authorize_owner(
        &self,
        principal: &Principal,
        resource_type: &str,
        resource_id: u64,
    ) -> std::result::Result<Grant, AuthError> {
        self.guard
            .require_resource_owner(principal, resource_type, resource_id)
            .await
    }

    /// Authenticate the header, then require `resource:action`
    pub async fn check(
        &self,
        header: Option<&str>,
        resource: Resource,
        action: Action,
    ) -> std::result::Result<(Principal, Grant), AuthError> {
        let principal = self.authenticate(header)?;
        let grant = self.authorize(&principal, resource, action).await?;
        Ok((principal, grant))
    }

    /// Get authentication configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub fn guard(&self) -> &AuthorizationGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::{MalformedHeader, TokenError};
    use crate::auth::rbac::roles::{DRIVER, MECHANIC};
    use crate::auth::rbac::{InMemoryOwnership, NoDynamicPermissions};

    fn system() -> AuthSystem {
        let config = AuthConfig {
            jwt_secret: "system-test-secret-0123456789abcdefghijklmnop".to_string(),
            ..AuthConfig::default()
        };
        AuthSystem::new(&config, Arc::new(NoDynamicPermissions)).unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..AuthConfig::default()
        };
        assert!(AuthSystem::new(&config, Arc::new(NoDynamicPermissions)).is_err());
    }

    #[test]
    fn test_authenticate_access_token() {
        let system = system();
        let pair = system
            .tokens()
            .issue_token_pair(5, "mech", MECHANIC, "mech@example.com")
            .unwrap();

        let principal = system.authenticate(Some(&bearer(&pair.access_token))).unwrap();
        assert_eq!(principal, Principal::new(5, "mech", "mech@example.com", MECHANIC));
    }

    #[test]
    fn test_authenticate_rejects_refresh_token() {
        let system = system();
        let pair = system
            .tokens()
            .issue_token_pair(5, "mech", MECHANIC, "mech@example.com")
            .unwrap();

        assert_eq!(
            system.authenticate(Some(&bearer(&pair.refresh_token))),
            Err(AuthError::InvalidToken(TokenError::WrongTokenType))
        );
    }

    #[test]
    fn test_authenticate_header_errors() {
        let system = system();
        assert_eq!(system.authenticate(None), Err(AuthError::MissingAuthorization));
        assert_eq!(
            system.authenticate(Some("Token abc")),
            Err(AuthError::MalformedAuthorization(MalformedHeader::WrongScheme))
        );
        assert_eq!(
            system.authenticate(Some("Bearer not-a-jwt")),
            Err(AuthError::InvalidToken(TokenError::Malformed))
        );
    }

    #[test]
    fn test_authenticate_optional() {
        let system = system();
        let pair = system
            .tokens()
            .issue_token_pair(5, "mech", MECHANIC, "mech@example.com")
            .unwrap();

        assert!(system.authenticate_optional(None).is_none());
        assert!(system.authenticate_optional(Some("Bearer junk")).is_none());
        assert_eq!(
            system
                .authenticate_optional(Some(&bearer(&pair.access_token)))
                .map(|p| p.user_id),
            Some(5)
        );
    }

    #[tokio::test]
    async fn test_check_end_to_end() {
        let system = system();
        let pair = system
            .tokens()
            .issue_token_pair(8, "driver", DRIVER, "driver@example.com")
            .unwrap();
        let header = bearer(&pair.access_token);

        let (principal, grant) = system
            .check(Some(&header), Resource::Vehicle, Action::Read)
            .await
            .unwrap();
        assert_eq!(principal.user_id, 8);
        assert_eq!(
            grant,
            Grant::Static {
                role: DRIVER.to_string()
            }
        );

        let err = system
            .check(Some(&header), Resource::Vehicle, Action::Delete)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "insufficient_permissions");
    }

    #[tokio::test]
    async fn test_authorize_owner_through_registry() {
        let vehicles = Arc::new(InMemoryOwnership::new());
        vehicles.insert(8, 100);
        let system = system()
            .with_ownership(OwnershipRegistry::new().with(Resource::Vehicle, vehicles));
        let driver = Principal::new(8, "driver", "driver@example.com", DRIVER);

        assert_eq!(
            system.authorize_owner(&driver, "vehicle", 100).await,
            Ok(Grant::Owner)
        );
        assert!(matches!(
            system.authorize_owner(&driver, "vehicle", 101).await,
            Err(AuthError::OwnershipDenied { .. })
        ));
    }

    #[tokio::test]
    async fn test_configured_admin_role_is_one_role() {
        let config = AuthConfig {
            jwt_secret: "system-test-secret-0123456789abcdefghijklmnop".to_string(),
            rbac: crate::config::RbacConfig {
                admin_role: "Superuser".to_string(),
                ..crate::config::RbacConfig::default()
            },
            ..AuthConfig::default()
        };
        let system = AuthSystem::new(&config, Arc::new(NoDynamicPermissions)).unwrap();
        let superuser = Principal::new(1, "root", "root@example.com", "Superuser");
        let administrator = Principal::new(2, "admin", "admin@example.com", "Administrator");

        // The bypass role and the whole-catalog role are the same role
        assert_eq!(
            system.authorize_owner(&superuser, "work_order", 42).await,
            Ok(Grant::Administrator)
        );
        assert_eq!(
            system
                .authorize(&superuser, Resource::Vehicle, Action::Read)
                .await,
            Ok(Grant::Static {
                role: "Superuser".to_string()
            })
        );
        assert_eq!(
            system.guard().effective_permissions(&superuser).await.unwrap(),
            crate::auth::rbac::all_permissions()
        );

        assert!(!system.guard().table().contains_role("Administrator"));
        assert!(
            system
                .authorize(&administrator, Resource::Vehicle, Action::Read)
                .await
                .is_err()
        );
        assert_eq!(
            system.authorize_owner(&administrator, "work_order", 42).await,
            Err(AuthError::UnsupportedResourceType("work_order".to_string()))
        );
    }
}
