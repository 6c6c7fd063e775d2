//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  kho-admin startup                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.imports() / db.inventory() / db.suppliers() ...                    │
//! │  (each repository clones the pool handle, which is cheap)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so readers of the
//! imports listing don't block a running `process`.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::audit::AuditLogRepository;
use crate::repository::catalog::CatalogRepository;
use crate::repository::import::ImportRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::supplier::SupplierRepository;
use crate::repository::user::UserRepository;
use crate::revalidate::{Revalidator, TracingRevalidator};

// =============================================================================
// Configuration
// =============================================================================

/// How to open the back-office database.
///
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/kho/kho.db")
///     .max_connections(8)
///     .busy_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file; created on first connect. `:memory:` for tests.
    pub database_path: PathBuf,

    /// Pool ceiling (default 5).
    pub max_connections: u32,

    /// Connections kept open while idle (default 1).
    pub min_connections: u32,

    /// How long `acquire` waits for a free connection (default 30s).
    pub connect_timeout: Duration,

    /// Idle connections above `min_connections` are dropped after this (default 10m).
    pub idle_timeout: Duration,

    /// How long a writer waits on SQLite's lock before `SQLITE_BUSY` (default 5s).
    /// Two admins processing imports at once queue here instead of failing.
    pub busy_timeout: Duration,

    /// Apply embedded migrations in [`Database::new`] (default true).
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A private in-memory database.
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// the pool is pinned to exactly one.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..DbConfig::new(":memory:")
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the back-office database; hands out repositories.
///
/// Cloning is cheap: the pool and the revalidator are both shared.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,

    /// Notified after every committed mutation.
    revalidator: Arc<dyn Revalidator>,
}

impl Database {
    /// Opens the pool and, unless disabled, brings the schema up to date.
    ///
    /// Every connection runs in WAL mode with `synchronous = NORMAL` and
    /// foreign keys enforced (item rows cascade with their import).
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Opening database"
        );

        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(config.busy_timeout)
            // off by default in SQLite
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!("Pool ready");

        let db = Database {
            pool,
            revalidator: Arc::new(TracingRevalidator),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Swaps the default [`TracingRevalidator`] for another hook.
    ///
    /// ```rust,ignore
    /// let recorder = Arc::new(RecordingRevalidator::new());
    /// let db = Database::new(DbConfig::in_memory()).await?.with_revalidator(recorder.clone());
    /// ```
    pub fn with_revalidator(mut self, revalidator: Arc<dyn Revalidator>) -> Self {
        self.revalidator = revalidator;
        self
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Raw pool, for queries and transactions no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.pool.clone())
    }

    /// Products, properties and their inventory rows.
    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone(), self.revalidator.clone())
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone(), self.revalidator.clone())
    }

    /// Import lifecycle: create, process, status and payment changes, bulk.
    pub fn imports(&self) -> ImportRepository {
        ImportRepository::new(self.pool.clone(), self.revalidator.clone())
    }

    pub fn audit_log(&self) -> AuditLogRepository {
        AuditLogRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections and closes the pool. Later queries fail.
    pub async fn close(&self) {
        debug!("Closing database pool");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
