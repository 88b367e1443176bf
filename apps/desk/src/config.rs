//! # Configuration
//!
//! Settings for the `clinica` binary.
//!
//! ## Loading Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults            (AppConfig::default)                            │
//! │  2. TOML file           (--config PATH, else <config dir>/clinica.toml) │
//! │  3. Environment         (CLINICA_DB_PATH, CLINICA_PAGE_SIZE,            │
//! │                          CLINICA_LOG)                                   │
//! │  4. Command-line flags  (--db, applied by the caller)                   │
//! │                                                                         │
//! │  Later layers win.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example File
//! ```toml
//! [database]
//! path = "/srv/clinica/clinica.db"
//! max_connections = 5
//!
//! [ui]
//! page_size = 20
//! search_limit = 50
//!
//! [log]
//! filter = "info,sqlx=warn"
//! ```

use clinica_core::{Page, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_LIMIT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const ENV_DB_PATH: &str = "CLINICA_DB_PATH";
pub const ENV_PAGE_SIZE: &str = "CLINICA_PAGE_SIZE";
pub const ENV_LOG: &str = "CLINICA_LOG";

const CONFIG_FILE: &str = "clinica.toml";
const DB_FILE: &str = "clinica.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),

    #[error("could not determine the application data directory")]
    NoDataDir,
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file, or `:memory:`. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Rows per page for `list`.
    pub page_size: i64,

    /// Default row limit for searches.
    pub search_limit: i64,
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            page_size: DEFAULT_PAGE_SIZE,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` still wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

// =============================================================================
// AppConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

impl AppConfig {
    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// An explicit `config_path` must exist; the default location is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `CLINICA_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            match size.trim().parse::<i64>() {
                Ok(n) => self.ui.page_size = n,
                Err(_) => warn!(value = %size, "Ignoring non-numeric {}", ENV_PAGE_SIZE),
            }
        }

        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            self.log.filter = Some(filter);
        }
    }

    /// Checks limits against the pagination bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Page::new(self.ui.page_size, 0)
            .map_err(|e| ConfigError::Invalid(format!("ui.page_size: {}", e)))?;
        Page::new(self.ui.search_limit, 0)
            .map_err(|e| ConfigError::Invalid(format!("ui.search_limit: {}", e)))?;

        Ok(())
    }

    /// Configured database path, else `<data dir>/clinica.db`.
    ///
    /// Creates the data directory when falling back to it.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;

        Ok(data_dir.join(DB_FILE))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "clinica", "clinica")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ui.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.ui.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [ui]
            page_size = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.ui.page_size, 5);
        assert_eq!(config.ui.search_limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB_PATH, "/tmp/other.db"),
            (ENV_PAGE_SIZE, "oops"),
            (ENV_LOG, "debug"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/other.db")));
        assert_eq!(config.ui.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.ui.page_size = 0;
        assert!(config.validate().is_err());

        config.ui.page_size = 1001;
        assert!(config.validate().is_err());

        config.ui.page_size = 1000;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinica.toml");
        std::fs::write(&path, "[database]\npath = \":memory:\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert!(config.database.path.is_some());

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[ui]"));
    }
}
