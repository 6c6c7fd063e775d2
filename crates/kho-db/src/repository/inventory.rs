//! # Inventory Repository
//!
//! Stock on hand, one row per property.
//!
//! ## Delta Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Stock is always changed relative to the stored value:              │
//! │                                                                     │
//! │    UPDATE inventory SET quantity = quantity + ?delta                │
//! │                                                                     │
//! │  never `SET quantity = ?absolute`. Two imports completing at the    │
//! │  same time both land: 10 + 3 + 5 = 18, not 13 or 15.                │
//! │                                                                     │
//! │  The stored value is read first only to reject a result below zero  │
//! │  or past i64::MAX.                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::{audit, begin_write};
use crate::error::{DbError, DbResult};
use crate::revalidate::{Revalidator, INVENTORY_PATH};
use kho_core::{AuditAction, AuditEntity, CoreError, Inventory, ValidationError};

const INVENTORY_COLUMNS: &str = "id, property_id, quantity, updated_at";

/// Adds `delta` to one inventory row inside the caller's transaction.
///
/// Returns `false` when the row does not exist. A result outside
/// `0..=i64::MAX` is rejected with `OutOfRange` and nothing is written.
pub(crate) async fn increment(
    conn: &mut SqliteConnection,
    inventory_id: &str,
    delta: i64,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    let current: Option<i64> = sqlx::query_scalar("SELECT quantity FROM inventory WHERE id = ?1")
        .bind(inventory_id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(current) = current else {
        return Ok(false);
    };

    let quantity = current
        .checked_add(delta)
        .filter(|q| *q >= 0)
        .ok_or_else(|| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        })?;

    debug!(inventory_id = %inventory_id, from = current, to = quantity, "Stock delta checked");

    sqlx::query("UPDATE inventory SET quantity = quantity + ?2, updated_at = ?3 WHERE id = ?1")
        .bind(inventory_id)
        .bind(delta)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(true)
}

pub(crate) async fn find_by_property(
    conn: &mut SqliteConnection,
    property_id: &str,
) -> DbResult<Option<Inventory>> {
    let inventory = sqlx::query_as::<_, Inventory>(&format!(
        "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE property_id = ?1"
    ))
    .bind(property_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(inventory)
}

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    revalidator: Arc<dyn Revalidator>,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool, revalidator: Arc<dyn Revalidator>) -> Self {
        InventoryRepository { pool, revalidator }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Inventory>> {
        let inventory = sqlx::query_as::<_, Inventory>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inventory)
    }

    pub async fn get_by_property(&self, property_id: &str) -> DbResult<Option<Inventory>> {
        let mut conn = self.pool.acquire().await?;
        find_by_property(&mut conn, property_id).await
    }

    /// All stock rows, lowest quantity first (what to reorder).
    pub async fn list(&self) -> DbResult<Vec<Inventory>> {
        let rows = sqlx::query_as::<_, Inventory>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory ORDER BY quantity, property_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Manual stock correction for one property (stock take, damage, loss).
    ///
    /// ## Rules
    /// - `delta` must not be zero
    /// - the resulting quantity may not go below zero
    /// - an `INVENTORY_ADJUSTED` audit row is written in the same transaction
    pub async fn adjust(
        &self,
        property_id: &str,
        delta: i64,
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> DbResult<Inventory> {
        if delta == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "delta".to_string(),
                reason: "must not be zero".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let current = find_by_property(&mut tx, property_id)
            .await?
            .ok_or_else(|| CoreError::InventoryNotFound(property_id.to_string()))?;

        if !increment(&mut tx, &current.id, delta, now).await? {
            return Err(DbError::not_found("Inventory", &current.id));
        }
        let quantity = current.quantity + delta;

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::InventoryAdjusted,
            AuditEntity::Inventory,
            &current.id,
            json!({
                "property_id": property_id,
                "delta": delta,
                "from": current.quantity,
                "to": quantity,
                "reason": reason,
            }),
        )
        .await?;

        tx.commit().await?;

        info!(
            property_id = %property_id,
            delta,
            quantity,
            "Inventory adjusted"
        );
        self.revalidator.revalidate(INVENTORY_PATH);

        Ok(Inventory {
            quantity,
            updated_at: now,
            ..current
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::repository::test_support::fixture;
    use crate::revalidate::INVENTORY_PATH;
    use kho_core::{AuditEntity, CoreError, ValidationError};

    #[tokio::test]
    async fn test_adjust_applies_delta_and_audits() {
        let f = fixture().await;
        let property = f.property_id(0);

        let inv = f
            .db
            .inventory()
            .adjust(&property, -4, Some("kiểm kê"), Some(&f.user.id))
            .await
            .unwrap();
        assert_eq!(inv.quantity, 6);
        assert_eq!(f.quantity(0).await, 6);

        let entries = f
            .db
            .audit_log()
            .list_for_entity(AuditEntity::Inventory, &inv.id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details_json().unwrap()["delta"], -4);
        assert_eq!(f.recorder.paths(), vec![INVENTORY_PATH]);
    }

    #[tokio::test]
    async fn test_adjust_rejects_zero_and_negative_stock() {
        let f = fixture().await;
        let property = f.property_id(0);
        let repo = f.db.inventory();

        assert!(repo.adjust(&property, 0, None, None).await.is_err());
        assert!(repo.adjust(&property, -11, None, None).await.is_err());
        assert_eq!(f.quantity(0).await, 10);

        let err = repo.adjust("missing", 1, None, None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_adjust_rejects_quantity_overflow() {
        let f = fixture().await;
        let property = f.property_id(0);

        let err = f
            .db
            .inventory()
            .adjust(&property, i64::MAX, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(f.quantity(0).await, 10);
    }

    #[tokio::test]
    async fn test_list_orders_by_quantity() {
        let f = fixture().await;
        let rows = f.db.inventory().list().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].quantity <= rows[1].quantity);
    }
}
