//! Configuration management for roster.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "roster";

/// Default data file name.
const DATA_FILE_NAME: &str = "students.json";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "ROSTER_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROSTER_`, sections split on `__`)
/// 2. TOML config file at `~/.config/roster/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Path prefix for every API route; `/` mounts at the root.
    pub base_path: String,
    /// Directory of frontend assets served for unmatched paths.
    pub static_dir: Option<PathBuf>,
    /// Attach a permissive CORS layer.
    pub cors: bool,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the student JSON document.
    /// Defaults to `~/.local/share/roster/students.json`
    pub data_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_path: "/api".to_string(),
            static_dir: None,
            cors: true,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "port must be greater than 0".to_string(),
            });
        }

        let base = &self.server.base_path;
        if !base.is_empty() && (!base.starts_with('/') || (base.len() > 1 && base.ends_with('/')))
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "base_path must start with '/' and must not end with '/', got '{base}'"
                ),
            });
        }

        if let Some(dir) = &self.server.static_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(Error::ConfigValidation {
                    message: format!("static_dir {} is not a directory", dir.display()),
                });
            }
        }

        Ok(())
    }

    /// Get the data file path, resolving defaults if not set.
    #[must_use]
    pub fn data_file(&self) -> PathBuf {
        self.storage
            .data_file
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATA_FILE_NAME))
    }

    /// Get the API mount point; `None` means the routes sit at the root.
    #[must_use]
    pub fn mount_path(&self) -> Option<&str> {
        match self.server.base_path.as_str() {
            "" | "/" => None,
            path => Some(path),
        }
    }

    /// Get the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::ConfigValidation {
            message: format!("invalid bind address '{addr}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.base_path, "/api");
        assert!(config.server.static_dir.is_none());
        assert!(config.server.cors);
        assert!(config.storage.data_file.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("port"));
    }

    #[test]
    fn test_validate_base_path() {
        let mut config = Config::default();
        for ok in ["", "/", "/api", "/api/v1"] {
            config.server.base_path = ok.to_string();
            assert!(config.validate().is_ok(), "rejected {ok}");
        }
        for bad in ["api", "/api/"] {
            config.server.base_path = bad.to_string();
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("base_path"), "accepted {bad}");
        }
    }

    #[test]
    fn test_validate_static_dir_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.server.static_dir = Some(file.path().to_path_buf());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("not a directory"));
    }

    #[test]
    fn test_mount_path() {
        let mut config = Config::default();
        assert_eq!(config.mount_path(), Some("/api"));

        config.server.base_path = "/".to_string();
        assert_eq!(config.mount_path(), None);

        config.server.base_path = String::new();
        assert_eq!(config.mount_path(), None);
    }

    #[test]
    fn test_bind_addr() {
        let mut config = Config::default();
        assert_eq!(
            config.bind_addr().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );

        config.server.host = "not a host".to_string();
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_data_file_default() {
        let config = Config::default();
        let path = config.data_file();

        assert!(path.to_string_lossy().contains("roster"));
        assert!(path.to_string_lossy().ends_with("students.json"));
    }

    #[test]
    fn test_data_file_custom() {
        let mut config = Config::default();
        config.storage.data_file = Some(PathBuf::from("/custom/students.json"));

        assert_eq!(config.data_file(), PathBuf::from("/custom/students.json"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("roster"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\nbase_path = \"/v1\"\n\n[storage]\ndata_file = \"/tmp/s.json\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.base_path, "/v1");
        assert_eq!(config.data_file(), PathBuf::from("/tmp/s.json"));
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 0\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_server_config_deserialize() {
        let json = r#"{"port": 9000, "cors": false}"#;
        let server: ServerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(server.port, 9000);
        assert!(!server.cors);
        assert_eq!(server.base_path, "/api");
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("base_path"));
        assert!(json.contains("data_file"));
    }
}
