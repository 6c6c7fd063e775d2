//! # Audit Log Repository
//!
//! Who changed which import or stock row, and how.
//!
//! Entries are written with [`insert_entry`] on the caller's transaction, so
//! an audit row exists if and only if the change it describes was committed.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::generate_id;
use crate::error::DbResult;
use kho_core::{AuditAction, AuditEntity, AuditLogEntry};

const AUDIT_COLUMNS: &str = "id, user_id, action, entity_type, entity_id, details, created_at";

/// Appends an audit entry inside an open transaction.
pub(crate) async fn insert_entry(
    conn: &mut SqliteConnection,
    user_id: Option<&str>,
    action: AuditAction,
    entity_type: AuditEntity,
    entity_id: &str,
    details: serde_json::Value,
) -> DbResult<()> {
    debug!(?action, entity_id = %entity_id, "Writing audit entry");

    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, entity_type, entity_id, details, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(generate_id())
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(details.to_string())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Read access to the audit trail.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AuditLogRepository { pool }
    }

    /// History of one record, oldest first.
    pub async fn list_for_entity(
        &self,
        entity_type: AuditEntity,
        entity_id: &str,
    ) -> DbResult<Vec<AuditLogEntry>> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs
             WHERE entity_type = ?1 AND entity_id = ?2
             ORDER BY created_at, rowid"
        ))
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// The `limit` most recent entries, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<AuditLogEntry>> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1"
        ))
        .bind(limit.clamp(1, kho_core::MAX_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
