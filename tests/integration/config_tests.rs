//! Configuration integration tests
//!
//! Loading from YAML files and building the auth system from the result.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;
    use ton_auth::auth::rbac::NoDynamicPermissions;
    use ton_auth::{AuthSystem, Config, PlatformError};

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_yaml_config_drives_token_lifetimes() {
        let file = write_config(
            r#"
auth:
  jwt_secret: "yaml-config-secret-0123456789-abcdefghijklmnop"
  jwt_algorithm: "HS384"
  issuer: "ton-staging"
  access_token_ttl: 300
  refresh_token_ttl: 86400
  refresh_grace: 0
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();
        let system = AuthSystem::new(config.auth(), Arc::new(NoDynamicPermissions)).unwrap();

        let pair = system
            .tokens()
            .issue_token_pair(1, "dana", "Driver", "dana@example.com")
            .unwrap();
        assert_eq!(pair.expires_in, 300);

        let claims = system.tokens().validate(&pair.access_token).unwrap();
        assert_eq!(claims.iss, "ton-staging");
        assert_eq!(claims.exp - claims.iat, 300);
        assert_eq!(system.tokens().refresh_horizon(), 86400);
    }

    #[tokio::test]
    async fn test_invalid_yaml_config_is_rejected() {
        let file = write_config(
            r#"
auth:
  jwt_secret: "yaml-config-secret-0123456789-abcdefghijklmnop"
  jwt_algorithm: "RS256"
"#,
        );

        let result = Config::from_file(file.path()).await;
        assert!(matches!(result, Err(PlatformError::Config(_))));
    }

    #[tokio::test]
    async fn test_unparseable_yaml() {
        let file = write_config("auth: [not, a, map");
        assert!(matches!(
            Config::from_file(file.path()).await,
            Err(PlatformError::Config(_))
        ));
    }

    #[test]
    fn test_config_round_trips_through_yaml() {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some("lookup-config-secret-0123456789-abcdefghijkl".to_string()),
            "JWT_ACCESS_EXPIRE_TIME" => Some("20".to_string()),
            _ => None,
        })
        .unwrap();

        let yaml = config.to_yaml().unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.auth.access_token_ttl, 1200);
        assert_eq!(parsed.auth.jwt_secret, config.auth.jwt_secret);
    }

    #[test]
    fn test_environment_value_errors() {
        let result = Config::from_lookup(|key| match key {
            "JWT_ACCESS_EXPIRE_TIME" => Some("fifteen".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(PlatformError::Config(_))));
    }
}
