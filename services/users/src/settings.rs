//! HTTP server configuration

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Load a `.env` file from the working directory or one of its parents.
///
/// Variables already present in the environment are left untouched.
pub fn load_env_file() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

/// Server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: 0.0.0.0)
    pub host: String,
    /// Port to bind (default: 8080)
    pub port: u16,
    /// Name reported by the health endpoint (default: users-api)
    pub service_name: String,
}

impl ServerConfig {
    /// Load server settings from the environment
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`, `SERVER_PORT`, `SERVER_SERVICE_NAME`
    /// - `PORT`: overrides `SERVER_PORT` when set
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("service_name", "users-api")?
            .add_source(Environment::with_prefix("SERVER").try_parsing(true))
            .set_override_option("port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()
    }

    /// `host:port` for the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in ["SERVER_HOST", "SERVER_PORT", "SERVER_SERVICE_NAME", "PORT"] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.service_name, "users-api");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    #[serial]
    fn test_server_config_from_prefixed_env() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_HOST", "127.0.0.1");
            std::env::set_var("SERVER_PORT", "9000");
            std::env::set_var("SERVER_SERVICE_NAME", "accounts");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.service_name, "accounts");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_bare_port_overrides_server_port() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_PORT", "9000");
            std::env::set_var("PORT", "3001");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 3001);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_file_feeds_server_config() {
        clear_env();
        let dir = std::env::temp_dir().join(format!("users-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(".env"),
            "SERVER_SERVICE_NAME=from-env-file\nSERVER_PORT=7070\n",
        )
        .unwrap();
        unsafe {
            std::env::set_var("SERVER_PORT", "9000");
        }

        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(&dir).unwrap();
        let loaded = load_env_file();
        std::env::set_current_dir(previous).unwrap();

        assert!(loaded.unwrap().ends_with(".env"));
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.service_name, "from-env-file");
        // already-set variables win over the file
        assert_eq!(config.port, 9000);

        clear_env();
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_an_error() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_PORT", "not-a-port");
        }

        assert!(ServerConfig::from_env().is_err());

        clear_env();
    }
}
