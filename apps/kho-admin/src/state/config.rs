//! # Admin Configuration
//!
//! Where the database lives, who is acting, and how loudly to log.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (--db, --actor)          applied by main.rs       │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     KHO_DB_PATH, KHO_ACTOR_ID, KHO_LOG, KHO_MAX_CONNECTIONS             │
//! │                                                                         │
//! │  3. TOML Config File                                                    │
//! │     --config <path>, or                                                 │
//! │     ~/.config/kho/kho.toml (Linux)                                      │
//! │     ~/Library/Application Support/vn.kho.kho/kho.toml (macOS)           │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! │     <data dir>/kho.db, no actor, "info,kho=debug,sqlx=warn"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kho.toml
//! [database]
//! path = "/var/lib/kho/kho.db"
//! max_connections = 5
//!
//! [admin]
//! actor_id = "2b7e1c1e-6c55-4d43-9a57-8f7a3c0e9f10"
//! log = "info,kho=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Default tracing filter when neither `RUST_LOG` nor `KHO_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,kho=debug,sqlx=warn";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file. `None` resolves to the platform data directory.
    pub path: Option<PathBuf>,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    /// User id recorded in the audit trail for mutating commands.
    pub actor_id: Option<String>,
    pub log: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        AdminSection {
            actor_id: None,
            log: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

// =============================================================================
// AdminConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub database: DatabaseSection,
    pub admin: AdminSection,
}

impl AdminConfig {
    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading admin config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        info!(?path, "Admin config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database.path must not be empty".into()));
            }
        }

        if let Some(actor) = &self.admin.actor_id {
            kho_core::validation::validate_uuid("admin.actor_id", actor)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `KHO_*` overrides from `lookup`. Unparseable numbers are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("KHO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(actor) = lookup("KHO_ACTOR_ID") {
            debug!(actor_id = %actor, "Overriding actor from environment");
            self.admin.actor_id = Some(actor);
        }

        if let Some(filter) = lookup("KHO_LOG") {
            self.admin.log = filter;
        }

        if let Some(max) = lookup("KHO_MAX_CONNECTIONS") {
            if let Ok(parsed) = max.parse::<u32>() {
                self.database.max_connections = parsed;
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("vn", "kho", "kho")
            .map(|dirs| dirs.config_dir().join("kho.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Database file, falling back to `<data dir>/kho.db` and finally `./kho.db`.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database.path {
            return path.clone();
        }

        directories::ProjectDirs::from("vn", "kho", "kho")
            .map(|dirs| dirs.data_dir().join("kho.db"))
            .unwrap_or_else(|| PathBuf::from("kho.db"))
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.admin.actor_id.as_deref()
    }

    pub fn log_filter(&self) -> &str {
        &self.admin.log
    }
}
