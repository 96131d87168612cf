use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub navigation: NavigationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Prefix for every outbound request
    pub base_url: String,
    pub timeout_secs: u64,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the durable key/value file; `None` uses the per-user default
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    pub max_redirects: usize,
    pub login_route: String,
    pub home_route: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("TASKBOARD_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("TASKBOARD_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("TASKBOARD_API_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Storage overrides
        if let Ok(v) = env::var("TASKBOARD_STORAGE_DIR") {
            self.storage.dir = Some(PathBuf::from(v));
        }

        // Navigation overrides
        if let Ok(v) = env::var("TASKBOARD_MAX_REDIRECTS") {
            self.navigation.max_redirects = v.parse().unwrap_or(self.navigation.max_redirects);
        }

        self
    }

    fn navigation_defaults() -> NavigationConfig {
        NavigationConfig {
            max_redirects: 3,
            login_route: crate::navigation::names::AUTHORIZATION_FORM.to_string(),
            home_route: crate::navigation::names::HOME.to_string(),
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_secs: 30,
                enable_request_logging: true,
            },
            storage: StorageConfig { dir: None },
            navigation: Self::navigation_defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.com/api".to_string(),
                timeout_secs: 15,
                enable_request_logging: true,
            },
            storage: StorageConfig { dir: None },
            navigation: Self::navigation_defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://app.example.com/api".to_string(),
                timeout_secs: 10,
                enable_request_logging: false,
            },
            storage: StorageConfig { dir: None },
            navigation: Self::navigation_defaults(),
        }
    }
}

// Global singleton config - read once at startup
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

pub fn config() -> &'static ClientConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = ClientConfig::development();
        assert!(config.api.base_url.starts_with("http://localhost"));
        assert!(config.api.enable_request_logging);
        assert_eq!(config.navigation.max_redirects, 3);
        assert_eq!(config.navigation.login_route, "AuthorizationForm");
    }

    #[test]
    fn test_default_production_config() {
        let config = ClientConfig::production();
        assert!(config.api.base_url.starts_with("https://"));
        assert!(!config.api.enable_request_logging);
        assert!(config.storage.dir.is_none());
    }
}
