//! # Database State
//!
//! Wraps the `Database` connection for use in admin commands.
//!
//! The `Database` struct from `kho-db` holds a `SqlitePool`, so commands can
//! share one `DbState` by reference without extra locking.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn get_import(db: &DbState, id: &str) -> Result<ImportDetail, ApiError> {
//!     Ok(db.inner().imports().get(id).await?)
//! }
//! ```

use tracing::info;

use super::AdminConfig;
use crate::error::ApiError;
use kho_db::{Database, DbConfig};

#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens (creating if needed) the database named by `config` and applies
    /// pending migrations.
    pub async fn open(config: &AdminConfig) -> Result<Self, ApiError> {
        let path = config.database_path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::internal(format!(
                    "Cannot create data directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        info!(?path, "Opening database");
        let db = Database::new(
            DbConfig::new(path).max_connections(config.database.max_connections),
        )
        .await?;

        Ok(DbState::new(db))
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}
