//! # Store Configuration
//!
//! File-backed settings for the product store.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Sources                                │
//! │                                                                         │
//! │  1. Defaults (StoreConfig::default)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. stockroom.toml (explicit path, or the platform config dir)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Environment                                                        │
//! │       STOCKROOM_DB_PATH      → database.path                           │
//! │       STOCKROOM_AUTHORITY    → store.authority                         │
//! │       STOCKROOM_PAGE_SIZE    → store.cursor_page_size                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use stockroom_core::DEFAULT_AUTHORITY;

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

// =============================================================================
// Database Section
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. `None` means the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Store Section
// =============================================================================

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Authority every address must carry.
    #[serde(default = "default_authority")]
    pub authority: String,

    /// Rows fetched per cursor page.
    #[serde(default = "default_cursor_page_size")]
    pub cursor_page_size: u32,

    /// Events buffered per subscriber before it is considered lagging.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}

fn default_cursor_page_size() -> u32 {
    64
}

fn default_notification_capacity() -> usize {
    256
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            authority: default_authority(),
            cursor_page_size: default_cursor_page_size(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

// =============================================================================
// StoreConfig
// =============================================================================

/// Complete store configuration.
///
/// ## File Format (stockroom.toml)
/// ```toml
/// [database]
/// path = "/var/lib/stockroom/inventory.db"
/// max_connections = 5
///
/// [store]
/// authority = "com.stockroom.inventory"
/// cursor_page_size = 64
/// notification_capacity = 256
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; a file that fails to parse is.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
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

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration as pretty TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        let authority = self.store.authority.trim();
        if authority.is_empty() || authority.contains('/') || authority.contains(':') {
            return Err(DbError::Config(format!(
                "authority must be a bare host name, got: {:?}",
                self.store.authority
            )));
        }

        if self.store.cursor_page_size == 0 {
            return Err(DbError::Config(
                "cursor_page_size must be greater than 0".into(),
            ));
        }

        if self.store.notification_capacity == 0 {
            return Err(DbError::Config(
                "notification_capacity must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("STOCKROOM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Ok(authority) = std::env::var("STOCKROOM_AUTHORITY") {
            debug!(authority = %authority, "Overriding authority from environment");
            self.store.authority = authority;
        }

        if let Ok(size) = std::env::var("STOCKROOM_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(n) => self.store.cursor_page_size = n,
                Err(_) => warn!(value = %size, "Ignoring unparsable STOCKROOM_PAGE_SIZE"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "inventory")
            .map(|dirs| dirs.config_dir().join("stockroom.toml"))
    }

    /// Platform data directory database file, used when no path is set.
    pub fn default_database_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "inventory")
            .map(|dirs| dirs.data_dir().join("inventory.db"))
    }

    /// Pool settings for the configured database file.
    pub fn db_config(&self) -> DbResult<DbConfig> {
        let path = self
            .database
            .path
            .clone()
            .or_else(Self::default_database_path)
            .ok_or_else(|| DbError::Config("No database path available".into()))?;

        Ok(DbConfig::new(path).max_connections(self.database.max_connections))
    }

    pub fn authority(&self) -> &str {
        &self.store.authority
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
