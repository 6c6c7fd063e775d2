//! # Database Migrations
//!
//! The schema ships inside the binary: `migrations/sqlite/*.sql` is embedded
//! at compile time and applied by [`Database::new`](crate::Database::new).
//!
//! ```text
//! migrations/sqlite/
//! └── 001_initial_schema.sql   users, suppliers, products, properties,
//!                              inventory, inventory_imports (+ items),
//!                              audit_logs
//! ```
//!
//! Applied versions are tracked in `_sqlx_migrations`. A migration that has
//! shipped is never edited; schema changes go in a new numbered file.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration not yet recorded. Safe to call repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let (total, applied) = migration_status(pool).await?;
    if applied >= total {
        debug!(total, "Schema up to date");
        return Ok(());
    }

    info!(pending = total - applied, "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!(total, "Schema migrated");

    Ok(())
}

/// `(embedded, applied)` migration counts. A fresh database reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let embedded = MIGRATOR.iter().count();

    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    Ok((embedded, applied as usize))
}
