use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::backend::database::DatabaseBackendConfig;
use crate::backend::DatabaseType;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub scim: ScimConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(rename = "type")]
    pub backend_type: String,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: String,
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScimConfig {
    /// Relative path (`/scim/v2`) or absolute URL; only the path is used for routing
    pub url: String,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Bearer,
    Basic,
    Unauthenticated,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(rename = "type")]
    pub auth_type: AuthType,
    pub token: Option<String>,
    pub basic: Option<BasicAuthConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

lazy_static! {
    static ref ENV_VAR: Regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("environment variable pattern is valid");
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            AppError::Configuration(msg) => {
                AppError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let expanded = Self::expand_env_vars(content)?;
        let config: AppConfig = serde_yaml::from_str(&expanded)
            .map_err(|e| AppError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory SQLite, unauthenticated, served under `/scim/v2`
    pub fn default_config() -> Self {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            backend: BackendConfig {
                backend_type: "database".to_string(),
                database: Some(DatabaseConfig {
                    db_type: "sqlite".to_string(),
                    url: ":memory:".to_string(),
                    max_connections: 1,
                    connection_timeout: default_connection_timeout(),
                }),
            },
            scim: ScimConfig {
                url: "/scim/v2".to_string(),
                auth: AuthConfig {
                    auth_type: AuthType::Unauthenticated,
                    token: None,
                    basic: None,
                },
            },
        }
    }

    /// Expand `${VAR_NAME}` or `${VAR_NAME:-default}`
    fn expand_env_vars(content: &str) -> AppResult<String> {
        let mut missing = None;
        let expanded = ENV_VAR.replace_all(content, |caps: &Captures| {
            match (std::env::var(&caps[1]), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => {
                    missing.get_or_insert_with(|| caps[1].to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(var_name) => Err(AppError::Configuration(format!(
                "Environment variable {} not found and no default provided",
                var_name
            ))),
            None => Ok(expanded.into_owned()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        match self.scim.auth.auth_type {
            AuthType::Bearer if self.scim.auth.token.as_deref().map_or(true, str::is_empty) => {
                return Err(AppError::Configuration(
                    "bearer authentication requires a token".to_string(),
                ));
            }
            AuthType::Basic if self.scim.auth.basic.is_none() => {
                return Err(AppError::Configuration(
                    "basic authentication requires username and password".to_string(),
                ));
            }
            _ => {}
        }
        self.base_path()?;
        Ok(())
    }

    /// Route prefix derived from `scim.url`, without a trailing slash
    pub fn base_path(&self) -> AppResult<String> {
        let url = self.scim.url.trim();
        let path = if url.starts_with("http://") || url.starts_with("https://") {
            url::Url::parse(url)
                .map_err(|e| AppError::Configuration(format!("Invalid scim.url {}: {}", url, e)))?
                .path()
                .to_string()
        } else {
            url.to_string()
        };

        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        if !trimmed.starts_with('/') {
            return Ok(format!("/{}", trimmed));
        }
        Ok(trimmed.to_string())
    }

    pub fn database_backend_config(&self) -> AppResult<DatabaseBackendConfig> {
        if self.backend.backend_type != "database" {
            return Err(AppError::Configuration(format!(
                "Unsupported backend type: {}",
                self.backend.backend_type
            )));
        }

        let Some(db) = self.backend.database.as_ref() else {
            return Ok(DatabaseBackendConfig::memory_sqlite());
        };

        let database_type = DatabaseType::from_name(&db.db_type).ok_or_else(|| {
            AppError::Configuration(format!("Unsupported database type: {}", db.db_type))
        })?;

        let mut config = DatabaseBackendConfig::new(database_type, db.url.clone())
            .with_max_connections(db.max_connections)
            .with_connection_timeout(db.connection_timeout);
        if config.is_memory_database() {
            config = config.with_max_connections(1);
        }
        config.validate().map_err(AppError::Configuration)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("SCIM_CFG_TEST_TOKEN", "secret_token_123");

        let expanded = AppConfig::expand_env_vars(
            "token: \"${SCIM_CFG_TEST_TOKEN:-default_token}\"\nhost: \"${SCIM_CFG_MISSING:-localhost}\"",
        )
        .unwrap();
        assert!(expanded.contains("secret_token_123"));
        assert!(expanded.contains("localhost"));

        let err = AppConfig::expand_env_vars("token: ${SCIM_CFG_NOT_SET_ANYWHERE}").unwrap_err();
        assert!(err.to_string().contains("SCIM_CFG_NOT_SET_ANYWHERE"));

        std::env::remove_var("SCIM_CFG_TEST_TOKEN");
    }

    #[test]
    fn test_config_file_loading() {
        let path = std::env::temp_dir().join(format!("scim-config-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
server:
  host: "0.0.0.0"
  port: 8080
backend:
  type: database
  database:
    type: sqlite
    url: "sqlite:./scim.db"
    max_connections: 5
    connection_timeout: 12
scim:
  url: "https://scim.example.com/scim/v2/"
  auth:
    type: basic
    basic:
      username: "admin"
      password: "${SCIM_CFG_UNSET_PASSWORD:-hunter2}"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.scim.auth.auth_type, AuthType::Basic);
        assert_eq!(config.scim.auth.basic.as_ref().unwrap().password, "hunter2");
        assert_eq!(config.base_path().unwrap(), "/scim/v2");

        let db = config.database_backend_config().unwrap();
        assert_eq!(db.connection_url, "sqlite:./scim.db");
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.connection_timeout, 12);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file("/nonexistent/path/config.yaml");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration file not found"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = AppConfig::from_yaml("invalid: yaml: content: [");
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default_config();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.scim.auth.auth_type, AuthType::Unauthenticated);
        assert_eq!(config.base_path().unwrap(), "/scim/v2");
        assert!(config.validate().is_ok());

        let db = config.database_backend_config().unwrap();
        assert!(db.is_memory_database());
        assert_eq!(db.max_connections, 1);
        assert_eq!(db.connection_timeout, 30);
    }

    #[test]
    fn test_bearer_requires_token() {
        let mut config = AppConfig::default_config();
        config.scim.auth.auth_type = AuthType::Bearer;
        assert!(config.validate().is_err());

        config.scim.auth.token = Some("t0ken".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_path_normalization() {
        let mut config = AppConfig::default_config();
        for (url, expected) in [
            ("/", ""),
            ("scim", "/scim"),
            ("/scim/v2/", "/scim/v2"),
            ("http://localhost:3000", ""),
        ] {
            config.scim.url = url.to_string();
            assert_eq!(config.base_path().unwrap(), expected, "{}", url);
        }
    }

    #[test]
    fn test_unsupported_backend() {
        let mut config = AppConfig::default_config();
        config.backend.database.as_mut().unwrap().db_type = "oracle".to_string();
        assert!(matches!(
            config.database_backend_config(),
            Err(AppError::Configuration(_))
        ));

        config.backend.backend_type = "ldap".to_string();
        assert!(config.database_backend_config().is_err());
    }
}
