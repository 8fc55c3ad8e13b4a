//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument / environment variable (both handled by the binary)
//! 2. TOML config file
//! 3. OS-dependent compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

const APP_DIR: &str = "evaltrack";
const DATABASE_FILE: &str = "evaltrack.db";

/// Contents of the optional TOML config file
///
/// Every key is optional; absent keys fall through to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory with the front-end static files
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Shared admin password; empty or absent disables the admin check
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub admin_password: Option<String>,
}

/// Fully resolved bootstrap configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Merge overrides over the file over the defaults
    pub fn resolve(overrides: Overrides, file: TomlConfig) -> Self {
        let admin_password = overrides
            .admin_password
            .or(file.admin_password)
            .filter(|p| !p.trim().is_empty());

        Self {
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or_else(default_database_path),
            static_dir: overrides.static_dir.or(file.static_dir),
            admin_password,
        }
    }
}

/// User config file location, if one exists
///
/// Linux also checks `/etc/evaltrack/config.toml`.
pub fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./evaltrack_data"))
        .join(DATABASE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::resolve(Overrides::default(), TomlConfig::default());
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_path.ends_with(DATABASE_FILE));
        assert!(config.static_dir.is_none());
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn overrides_win_over_file() {
        let file = TomlConfig::parse(
            r#"
            port = 8080
            database_path = "/tmp/from-file.db"
            admin_password = "file-secret"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            port: Some(9090),
            ..Default::default()
        };

        let config = Config::resolve(overrides, file);
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, PathBuf::from("/tmp/from-file.db"));
        assert_eq!(config.admin_password.as_deref(), Some("file-secret"));
    }

    #[test]
    fn blank_admin_password_disables_check() {
        let overrides = Overrides {
            admin_password: Some("   ".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(overrides, TomlConfig::default());
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = TomlConfig::parse("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
