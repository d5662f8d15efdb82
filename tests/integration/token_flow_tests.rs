//! Token lifecycle integration tests
//!
//! Login, bearer authentication, expiry and refresh through the public API,
//! driven by a manual clock.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{self, PASSWORD, START};
    use crate::common::UserFactory;
    use std::sync::Arc;
    use ton_auth::auth::rbac::{
        Action, AuthorizationGuard, NoDynamicPermissions, Resource, default_roles,
    };
    use ton_auth::auth::rbac::roles::{ACCOUNTANT, MECHANIC};
    use ton_auth::auth::{
        Argon2Verifier, AuthError, AuthService, AuthSystem, InMemoryUserDirectory, LoginRequest,
        TokenError, TokenStatus,
    };
    use ton_auth::utils::ErrorResponse;

    struct Harness {
        system: AuthSystem,
        service: AuthService,
        users: Arc<InMemoryUserDirectory>,
        clock: Arc<ton_auth::auth::jwt::ManualClock>,
    }

    fn harness() -> Harness {
        let config = fixtures::auth_config();
        let (tokens, clock) = fixtures::token_service();
        let guard = AuthorizationGuard::new(
            Arc::new(default_roles()),
            Arc::new(NoDynamicPermissions),
            &config.rbac,
        );
        let system = AuthSystem::from_parts(&config, tokens.clone(), guard);

        let users = Arc::new(InMemoryUserDirectory::new());
        users.insert(UserFactory::create(1, MECHANIC));
        users.insert(UserFactory::create(2, ACCOUNTANT));
        users.insert(UserFactory::inactive(3, MECHANIC));
        let service = AuthService::new(tokens, users.clone(), Arc::new(Argon2Verifier::new()));

        Harness {
            system,
            service,
            users,
            clock,
        }
    }

    fn login_request(user_id: u64) -> LoginRequest {
        LoginRequest {
            email: format!("user{}@example.com", user_id),
            password: PASSWORD.to_string(),
        }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn test_login_then_authorize() {
        let h = harness();
        let response = h.service.login(&login_request(1)).await.unwrap();
        let header = bearer(&response.tokens.access_token);

        let principal = h.system.authenticate(Some(&header)).unwrap();
        assert_eq!(principal.user_id, 1);
        assert_eq!(principal.role, MECHANIC);

        assert!(
            h.system
                .authorize(&principal, Resource::WorkOrder, Action::Update)
                .await
                .is_ok()
        );
        let denied = h
            .system
            .authorize(&principal, Resource::WorkOrder, Action::Assign)
            .await
            .unwrap_err();
        assert_eq!(denied.code(), "insufficient_permissions");
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_log_in() {
        let h = harness();
        let err = h.service.login(&login_request(3)).await.unwrap_err();
        assert_eq!(err, AuthError::AccountInactive);
    }

    #[tokio::test]
    async fn test_access_token_expires_at_exp() {
        let h = harness();
        let pair = h.service.login(&login_request(2)).await.unwrap().tokens;
        let header = bearer(&pair.access_token);
        let tokens = h.system.tokens();

        h.clock.set(START + 15 * 60 - 1);
        assert!(h.system.authenticate(Some(&header)).is_ok());
        assert_eq!(tokens.token_status(&pair.access_token), TokenStatus::Active);

        h.clock.set(START + 15 * 60);
        assert_eq!(
            h.system.authenticate(Some(&header)),
            Err(AuthError::ExpiredToken)
        );
        assert!(tokens.is_expired(&pair.access_token));
        assert!(!tokens.is_usable(&pair.access_token));
    }

    #[tokio::test]
    async fn test_refresh_within_grace_window() {
        let h = harness();
        let pair = h.service.login(&login_request(1)).await.unwrap().tokens;
        let refresh_exp = START + 7 * 24 * 3600;

        // Past exp but inside the grace window
        h.clock.set(refresh_exp + 3600);
        let refreshed = h.service.refresh(&pair.refresh_token).await.unwrap();
        assert_ne!(refreshed.tokens.access_token, pair.access_token);
        assert!(
            h.system
                .authenticate(Some(&bearer(&refreshed.tokens.access_token)))
                .is_ok()
        );

        // Past exp + grace
        h.clock.set(refresh_exp + 7 * 24 * 3600 + 1);
        assert_eq!(
            h.service.refresh(&pair.refresh_token).await.unwrap_err(),
            AuthError::ExpiredToken
        );
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_refresh() {
        let h = harness();
        let pair = h.service.login(&login_request(1)).await.unwrap().tokens;

        h.users.set_active(1, false);
        assert_eq!(
            h.service.refresh(&pair.refresh_token).await.unwrap_err(),
            AuthError::AccountInactive
        );
    }

    #[test]
    fn test_refresh_token_is_not_a_bearer_credential() {
        let h = harness();
        let pair = h
            .system
            .tokens()
            .issue_token_pair(1, "user1", MECHANIC, "user1@example.com")
            .unwrap();

        let err = h
            .system
            .authenticate(Some(&bearer(&pair.refresh_token)))
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken(TokenError::WrongTokenType));
        assert!(err.is_authentication());
    }

    #[test]
    fn test_token_from_another_deployment_is_rejected() {
        let h = harness();
        let other = ton_auth::TokenService::new(&ton_auth::config::AuthConfig {
            jwt_secret: "some-other-deployment-secret-0123456789abcdef".to_string(),
            ..fixtures::auth_config()
        })
        .unwrap();
        let pair = other
            .issue_token_pair(1, "user1", MECHANIC, "user1@example.com")
            .unwrap();

        assert_eq!(
            h.system.authenticate(Some(&bearer(&pair.access_token))),
            Err(AuthError::InvalidToken(TokenError::InvalidSignature))
        );
    }

    #[test]
    fn test_error_body_never_echoes_the_token() {
        let h = harness();
        let header = "Bearer eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl";
        let err = h.system.authenticate(Some(header)).unwrap_err();

        let body = serde_json::to_string(&ErrorResponse::from_auth_error(&err)).unwrap();
        assert!(body.contains("invalid_token"));
        assert!(!body.contains("eyJhbGciOiJIUzI1NiJ9"));
    }
}
