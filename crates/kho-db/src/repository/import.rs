//! # Inventory Import Repository
//!
//! The inventory import lifecycle: create, process, status and payment
//! updates, cancellation, edits, deletion and their bulk variants.
//!
//! ## Processing an Import
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       process(import_id)                                │
//! │                                                                         │
//! │  BEGIN IMMEDIATE                                                        │
//! │   │                                                                     │
//! │   ├── SELECT import                 → ImportNotFound                    │
//! │   ├── lifecycle::ensure_processable → ImportNotPending                  │
//! │   │                                                                     │
//! │   ├── UPDATE inventory_imports                                          │
//! │   │     SET import_status = 'COMPLETED'                                 │
//! │   │   WHERE id = ? AND import_status = 'PENDING'                        │
//! │   │     rows_affected == 0          → ImportStatusChanged               │
//! │   │                                                                     │
//! │   ├── for item in items:                                                │
//! │   │     UPDATE inventory SET quantity = quantity + item.quantity        │
//! │   │                                                                     │
//! │   └── INSERT audit_logs (IMPORT_PROCESSED)                              │
//! │  COMMIT                                                                 │
//! │   │                                                                     │
//! │   ▼                                                                     │
//! │  revalidate imports list, import detail, inventory                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Write transactions take SQLite's write lock up front, so a concurrent
//! `process` waits and then reads COMPLETED (`ImportNotPending`). The status
//! flip is still conditioned on the status that was read and runs before any
//! stock moves: stock is added exactly once.
//!
//! ## Bulk Operations
//! Ids are handled one after another, each in its own transaction. A failure
//! is recorded in the report and never rolls back earlier successes.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::{audit, begin_write, generate_id, inventory};
use crate::error::DbResult;
use crate::revalidate::{import_path, Revalidator, IMPORTS_PATH, INVENTORY_PATH};
use kho_core::lifecycle;
use kho_core::validation::{validate_description, validate_new_import, validate_reference};
use kho_core::{
    AuditAction, AuditEntity, BulkItemResult, BulkOperationReport, CoreError, ImportDetail,
    ImportFilter, ImportStatus, InventoryImport, InventoryImportItem, NewImport, PaymentStatus,
    ValidationError,
};

const IMPORT_COLUMNS: &str = "id, user_id, supplier_id, reference, description, total_amount, \
                              payment_status, import_status, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, import_id, property_id, inventory_id, quantity, net_price, \
                            warranty_period_days, warranty_expiry, notes, created_at";

/// Repository for inventory imports.
///
/// ## Usage
/// ```rust,ignore
/// let imports = db.imports();
///
/// let detail = imports.create(&input).await?;
/// imports.update_status(&detail.import.id, ImportStatus::Pending, Some(&actor)).await?;
/// imports.process(&detail.import.id, Some(&actor)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ImportRepository {
    pool: SqlitePool,
    revalidator: Arc<dyn Revalidator>,
}

impl ImportRepository {
    pub fn new(pool: SqlitePool, revalidator: Arc<dyn Revalidator>) -> Self {
        ImportRepository { pool, revalidator }
    }

    /// The hook notified after each committed change.
    pub fn revalidator(&self) -> &Arc<dyn Revalidator> {
        &self.revalidator
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Creates an import with its items.
    ///
    /// ## What This Does
    /// 1. Validates the input (at least one item, quantities, prices, warranty)
    /// 2. Checks that the user and the supplier exist
    /// 3. Resolves every `property_id` to its inventory record
    /// 4. Inserts the import, items and an `IMPORT_CREATED` audit row
    ///
    /// Everything happens in one transaction: a missing property leaves no
    /// partial import behind.
    ///
    /// An import created directly as COMPLETED receives its stock in the same
    /// transaction; one created as CANCELLED gets a CANCELLED payment status.
    pub async fn create(&self, input: &NewImport) -> DbResult<ImportDetail> {
        validate_new_import(input)?;
        let total_amount = input.total_amount()?;

        let now = Utc::now();
        let import_id = generate_id();
        let payment_status = lifecycle::payment_status_for(
            input.payment_status,
            ImportStatus::Draft,
            input.import_status,
        );

        debug!(
            import_id = %import_id,
            supplier_id = %input.supplier_id,
            items = input.items.len(),
            "Creating inventory import"
        );

        let mut tx = begin_write(&self.pool).await?;

        if !ensure_exists(&mut tx, "users", &input.user_id).await? {
            return Err(CoreError::UserNotFound(input.user_id.clone()).into());
        }
        if !ensure_exists(&mut tx, "suppliers", &input.supplier_id).await? {
            return Err(CoreError::SupplierNotFound(input.supplier_id.clone()).into());
        }

        let mut items = Vec::with_capacity(input.items.len());
        for new_item in &input.items {
            let inventory_id = resolve_inventory(&mut tx, &new_item.property_id).await?;

            items.push(InventoryImportItem {
                id: generate_id(),
                import_id: import_id.clone(),
                property_id: new_item.property_id.clone(),
                inventory_id,
                quantity: new_item.quantity,
                net_price: new_item.net_price,
                warranty_period_days: new_item.warranty_period_days,
                warranty_expiry: new_item.warranty_expiry,
                notes: new_item.notes.clone(),
                created_at: now,
            });
        }

        let import = InventoryImport {
            id: import_id.clone(),
            user_id: input.user_id.clone(),
            supplier_id: input.supplier_id.clone(),
            reference: input.reference.clone(),
            description: input.description.clone(),
            total_amount: total_amount.dong(),
            payment_status,
            import_status: input.import_status,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO inventory_imports (
                id, user_id, supplier_id, reference, description, total_amount,
                payment_status, import_status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&import.id)
        .bind(&import.user_id)
        .bind(&import.supplier_id)
        .bind(&import.reference)
        .bind(&import.description)
        .bind(import.total_amount)
        .bind(import.payment_status)
        .bind(import.import_status)
        .bind(import.created_at)
        .bind(import.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            insert_item(&mut tx, item).await?;
        }

        let stock_applied =
            lifecycle::requires_stock_increment(ImportStatus::Draft, import.import_status);
        if stock_applied {
            apply_stock(&mut tx, &items, now).await?;
        }

        audit::insert_entry(
            &mut tx,
            Some(&import.user_id),
            AuditAction::ImportCreated,
            AuditEntity::InventoryImport,
            &import.id,
            json!({
                "supplier_id": import.supplier_id,
                "items": items.len(),
                "total_amount": import.total_amount,
                "import_status": import.import_status,
                "stock_applied": stock_applied,
            }),
        )
        .await?;

        tx.commit().await?;

        info!(
            import_id = %import.id,
            status = %import.import_status,
            total = %import.total(),
            "Inventory import created"
        );

        self.revalidator.revalidate(IMPORTS_PATH);
        if stock_applied {
            self.revalidator.revalidate(INVENTORY_PATH);
        }

        Ok(ImportDetail { import, items })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Receives a PENDING import: adds every item's quantity to its inventory
    /// and marks the import COMPLETED.
    ///
    /// ## Errors
    /// - `ImportNotFound` when the id does not exist
    /// - `ImportNotPending` when the import is in any other status
    /// - `ImportStatusChanged` when another request completed it first
    ///
    /// On error no inventory row is touched.
    pub async fn process(&self, import_id: &str, actor: Option<&str>) -> DbResult<InventoryImport> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_import(&mut tx, import_id).await?;
        lifecycle::ensure_processable(import_id, current.import_status)?;

        set_status_guarded(
            &mut tx,
            import_id,
            current.import_status,
            ImportStatus::Completed,
            current.payment_status,
            now,
        )
        .await?;

        let items = fetch_items(&mut tx, import_id).await?;
        let quantity_added = apply_stock(&mut tx, &items, now).await?;

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::ImportProcessed,
            AuditEntity::InventoryImport,
            import_id,
            json!({
                "items": items.len(),
                "quantity_added": quantity_added,
            }),
        )
        .await?;

        tx.commit().await?;

        info!(
            import_id = %import_id,
            items = items.len(),
            quantity = quantity_added,
            "Inventory import processed"
        );
        self.revalidate_import(import_id, true);

        Ok(InventoryImport {
            import_status: ImportStatus::Completed,
            updated_at: now,
            ..current
        })
    }

    /// Moves an import to `target`.
    ///
    /// ## Transition Guard
    /// - COMPLETED may only move to CANCELLED (stock is not taken back)
    /// - CANCELLED may only move to DRAFT
    /// - every other transition is accepted
    ///
    /// When a DRAFT, PENDING or PROCESSING import becomes COMPLETED the
    /// stock increment runs in the same transaction as the status change.
    pub async fn update_status(
        &self,
        import_id: &str,
        target: ImportStatus,
        actor: Option<&str>,
    ) -> DbResult<InventoryImport> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_import(&mut tx, import_id).await?;
        lifecycle::check_transition(current.import_status, target)?;

        let payment_status =
            lifecycle::payment_status_for(current.payment_status, current.import_status, target);
        let stock_applied = lifecycle::requires_stock_increment(current.import_status, target);

        set_status_guarded(
            &mut tx,
            import_id,
            current.import_status,
            target,
            payment_status,
            now,
        )
        .await?;

        let quantity_added = if stock_applied {
            let items = fetch_items(&mut tx, import_id).await?;
            apply_stock(&mut tx, &items, now).await?
        } else {
            0
        };

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::ImportStatusUpdated,
            AuditEntity::InventoryImport,
            import_id,
            json!({
                "from": current.import_status,
                "to": target,
                "payment_status": payment_status,
                "quantity_added": quantity_added,
            }),
        )
        .await?;

        tx.commit().await?;

        info!(
            import_id = %import_id,
            from = %current.import_status,
            to = %target,
            stock_applied,
            "Import status updated"
        );
        self.revalidate_import(import_id, stock_applied);

        Ok(InventoryImport {
            import_status: target,
            payment_status,
            updated_at: now,
            ..current
        })
    }

    /// Sets the payment status. Any value is accepted for an existing import.
    pub async fn update_payment_status(
        &self,
        import_id: &str,
        payment_status: PaymentStatus,
        actor: Option<&str>,
    ) -> DbResult<InventoryImport> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_import(&mut tx, import_id).await?;

        let result = sqlx::query(
            "UPDATE inventory_imports SET payment_status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(import_id)
        .bind(payment_status)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ImportNotFound(import_id.to_string()).into());
        }

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::ImportPaymentUpdated,
            AuditEntity::InventoryImport,
            import_id,
            json!({ "from": current.payment_status, "to": payment_status }),
        )
        .await?;

        tx.commit().await?;

        info!(import_id = %import_id, payment_status = %payment_status, "Import payment status updated");
        self.revalidate_import(import_id, false);

        Ok(InventoryImport {
            payment_status,
            updated_at: now,
            ..current
        })
    }

    /// Cancels a DRAFT or PENDING import and cancels its payment.
    pub async fn cancel(&self, import_id: &str, actor: Option<&str>) -> DbResult<InventoryImport> {
        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_import(&mut tx, import_id).await?;
        lifecycle::ensure_cancellable(import_id, current.import_status)?;

        set_status_guarded(
            &mut tx,
            import_id,
            current.import_status,
            ImportStatus::Cancelled,
            PaymentStatus::Cancelled,
            now,
        )
        .await?;

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::ImportCancelled,
            AuditEntity::InventoryImport,
            import_id,
            json!({ "from": current.import_status }),
        )
        .await?;

        tx.commit().await?;

        info!(import_id = %import_id, from = %current.import_status, "Import cancelled");
        self.revalidate_import(import_id, false);

        Ok(InventoryImport {
            import_status: ImportStatus::Cancelled,
            payment_status: PaymentStatus::Cancelled,
            updated_at: now,
            ..current
        })
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Changes reference and/or description while the import is DRAFT or
    /// PENDING. `None` keeps the stored value.
    pub async fn update_details(
        &self,
        import_id: &str,
        reference: Option<&str>,
        description: Option<&str>,
        actor: Option<&str>,
    ) -> DbResult<InventoryImport> {
        validate_reference(reference)?;
        validate_description("description", description)?;

        let now = Utc::now();
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_import(&mut tx, import_id).await?;
        lifecycle::ensure_editable(import_id, current.import_status)?;

        let result = sqlx::query(
            r#"
            UPDATE inventory_imports SET
                reference = COALESCE(?3, reference),
                description = COALESCE(?4, description),
                updated_at = ?5
            WHERE id = ?1 AND import_status = ?2
            "#,
        )
        .bind(import_id)
        .bind(current.import_status)
        .bind(reference)
        .bind(description)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ImportStatusChanged {
                import_id: import_id.to_string(),
                expected: current.import_status,
            }
            .into());
        }

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::ImportUpdated,
            AuditEntity::InventoryImport,
            import_id,
            json!({ "reference": reference, "description": description }),
        )
        .await?;

        let updated = fetch_import(&mut tx, import_id).await?;
        tx.commit().await?;

        debug!(import_id = %import_id, "Import details updated");
        self.revalidate_import(import_id, false);

        Ok(updated)
    }

    /// Deletes a DRAFT or CANCELLED import. Its items are removed with it.
    pub async fn delete(&self, import_id: &str, actor: Option<&str>) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let current = fetch_import(&mut tx, import_id).await?;
        lifecycle::ensure_deletable(import_id, current.import_status)?;

        let result =
            sqlx::query("DELETE FROM inventory_imports WHERE id = ?1 AND import_status = ?2")
                .bind(import_id)
                .bind(current.import_status)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ImportStatusChanged {
                import_id: import_id.to_string(),
                expected: current.import_status,
            }
            .into());
        }

        audit::insert_entry(
            &mut tx,
            actor,
            AuditAction::ImportDeleted,
            AuditEntity::InventoryImport,
            import_id,
            json!({
                "status": current.import_status,
                "reference": current.reference,
                "total_amount": current.total_amount,
            }),
        )
        .await?;

        tx.commit().await?;

        info!(import_id = %import_id, "Import deleted");
        self.revalidate_import(import_id, false);

        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn get_by_id(&self, import_id: &str) -> DbResult<Option<InventoryImport>> {
        let import = sqlx::query_as::<_, InventoryImport>(&format!(
            "SELECT {IMPORT_COLUMNS} FROM inventory_imports WHERE id = ?1"
        ))
        .bind(import_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(import)
    }

    /// Import with its items.
    pub async fn get(&self, import_id: &str) -> DbResult<ImportDetail> {
        let import = self
            .get_by_id(import_id)
            .await?
            .ok_or_else(|| CoreError::ImportNotFound(import_id.to_string()))?;
        let items = self.items(import_id).await?;

        Ok(ImportDetail { import, items })
    }

    pub async fn items(&self, import_id: &str) -> DbResult<Vec<InventoryImportItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, import_id).await
    }

    /// Imports matching `filter`, newest first.
    pub async fn list(&self, filter: &ImportFilter) -> DbResult<Vec<InventoryImport>> {
        let imports = sqlx::query_as::<_, InventoryImport>(&format!(
            "SELECT {IMPORT_COLUMNS} FROM inventory_imports
             WHERE (?1 IS NULL OR import_status = ?1)
               AND (?2 IS NULL OR payment_status = ?2)
               AND (?3 IS NULL OR supplier_id = ?3)
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?4 OFFSET ?5"
        ))
        .bind(filter.import_status)
        .bind(filter.payment_status)
        .bind(&filter.supplier_id)
        .bind(filter.effective_limit())
        .bind(filter.effective_offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(imports)
    }

    // =========================================================================
    // Bulk
    // =========================================================================

    pub async fn bulk_process(&self, ids: &[String], actor: Option<&str>) -> BulkOperationReport {
        run_bulk("process", ids, |id| async move { self.process(&id, actor).await }).await
    }

    pub async fn bulk_cancel(&self, ids: &[String], actor: Option<&str>) -> BulkOperationReport {
        run_bulk("cancel", ids, |id| async move { self.cancel(&id, actor).await }).await
    }

    pub async fn bulk_update_status(
        &self,
        ids: &[String],
        target: ImportStatus,
        actor: Option<&str>,
    ) -> BulkOperationReport {
        run_bulk("update_status", ids, |id| async move {
            self.update_status(&id, target, actor).await
        })
        .await
    }

    pub async fn bulk_update_payment_status(
        &self,
        ids: &[String],
        payment_status: PaymentStatus,
        actor: Option<&str>,
    ) -> BulkOperationReport {
        run_bulk("update_payment_status", ids, |id| async move {
            self.update_payment_status(&id, payment_status, actor).await
        })
        .await
    }

    fn revalidate_import(&self, import_id: &str, stock_changed: bool) {
        self.revalidator.revalidate(IMPORTS_PATH);
        self.revalidator.revalidate(&import_path(import_id));
        if stock_changed {
            self.revalidator.revalidate(INVENTORY_PATH);
        }
    }
}

// =============================================================================
// Transaction Helpers
// =============================================================================

async fn run_bulk<F, Fut, T>(operation: &str, ids: &[String], mut op: F) -> BulkOperationReport
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = DbResult<T>>,
{
    let mut results = Vec::with_capacity(ids.len());

    for id in ids {
        match op(id.clone()).await {
            Ok(_) => results.push(BulkItemResult::ok(id.as_str())),
            Err(e) => {
                warn!(operation, import_id = %id, error = %e, "Bulk item failed");
                results.push(BulkItemResult::failed(id.as_str(), e.to_string()));
            }
        }
    }

    let report = BulkOperationReport::from_results(results);
    info!(
        operation,
        succeeded = report.succeeded,
        failed = report.failed,
        "Bulk operation finished"
    );
    report
}

/// `table` is one of our own table names, never user input.
async fn ensure_exists(conn: &mut SqliteConnection, table: &str, id: &str) -> DbResult<bool> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE id = ?1"))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

/// property_id → inventory_id, distinguishing an unknown property from a
/// property without stock record.
async fn resolve_inventory(conn: &mut SqliteConnection, property_id: &str) -> DbResult<String> {
    if let Some(inv) = inventory::find_by_property(conn, property_id).await? {
        return Ok(inv.id);
    }

    if ensure_exists(conn, "properties", property_id).await? {
        Err(CoreError::InventoryNotFound(property_id.to_string()).into())
    } else {
        Err(CoreError::PropertyNotFound(property_id.to_string()).into())
    }
}

async fn fetch_import(conn: &mut SqliteConnection, import_id: &str) -> DbResult<InventoryImport> {
    sqlx::query_as::<_, InventoryImport>(&format!(
        "SELECT {IMPORT_COLUMNS} FROM inventory_imports WHERE id = ?1"
    ))
    .bind(import_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| CoreError::ImportNotFound(import_id.to_string()).into())
}

async fn fetch_items(
    conn: &mut SqliteConnection,
    import_id: &str,
) -> DbResult<Vec<InventoryImportItem>> {
    let items = sqlx::query_as::<_, InventoryImportItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM inventory_import_items WHERE import_id = ?1 ORDER BY rowid"
    ))
    .bind(import_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

async fn insert_item(conn: &mut SqliteConnection, item: &InventoryImportItem) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_import_items (
            id, import_id, property_id, inventory_id, quantity, net_price,
            warranty_period_days, warranty_expiry, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&item.id)
    .bind(&item.import_id)
    .bind(&item.property_id)
    .bind(&item.inventory_id)
    .bind(item.quantity)
    .bind(item.net_price)
    .bind(item.warranty_period_days)
    .bind(item.warranty_expiry)
    .bind(&item.notes)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Compare-and-set on `import_status`: fails with `ImportStatusChanged` when
/// the row no longer has the status the caller read.
async fn set_status_guarded(
    conn: &mut SqliteConnection,
    import_id: &str,
    expected: ImportStatus,
    target: ImportStatus,
    payment_status: PaymentStatus,
    now: DateTime<Utc>,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE inventory_imports SET
            import_status = ?3,
            payment_status = ?4,
            updated_at = ?5
        WHERE id = ?1 AND import_status = ?2
        "#,
    )
    .bind(import_id)
    .bind(expected)
    .bind(target)
    .bind(payment_status)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::ImportStatusChanged {
            import_id: import_id.to_string(),
            expected,
        }
        .into());
    }

    Ok(())
}

/// Adds every item's quantity to its inventory row. Returns the units added.
async fn apply_stock(
    conn: &mut SqliteConnection,
    items: &[InventoryImportItem],
    now: DateTime<Utc>,
) -> DbResult<i64> {
    let mut added: i64 = 0;

    for item in items {
        if !inventory::increment(conn, &item.inventory_id, item.quantity, now).await? {
            return Err(CoreError::InventoryNotFound(item.property_id.clone()).into());
        }
        debug!(
            inventory_id = %item.inventory_id,
            quantity = item.quantity,
            "Stock received"
        );
        added = added.checked_add(item.quantity).ok_or_else(|| ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        })?;
    }

    Ok(added)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{fixture, Fixture};

    async fn pending_import(f: &Fixture, lines: &[(usize, i64)]) -> String {
        f.db.imports()
            .create(&f.import_input(ImportStatus::Pending, lines))
            .await
            .unwrap()
            .import
            .id
    }

    #[tokio::test]
    async fn test_create_computes_total_and_resolves_inventory() {
        let f = fixture().await;
        let detail = f
            .db
            .imports()
            .create(&f.import_input(ImportStatus::Draft, &[(0, 3), (1, 5)]))
            .await
            .unwrap();

        assert_eq!(detail.import.total_amount, 8 * 100_000);
        assert_eq!(detail.import.import_status, ImportStatus::Draft);
        assert_eq!(detail.import.payment_status, PaymentStatus::Pending);
        assert_eq!(detail.items.len(), 2);

        let inv = f.db.inventory().get_by_property(&f.property_id(0)).await.unwrap().unwrap();
        assert_eq!(detail.items[0].inventory_id, inv.id);

        // draft creation never touches stock
        assert_eq!(f.quantity(0).await, 10);
        assert_eq!(f.recorder.paths(), vec![IMPORTS_PATH]);

        let stored = f.db.imports().get(&detail.import.id).await.unwrap();
        assert_eq!(stored.items.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_references() {
        let f = fixture().await;
        let imports = f.db.imports();

        let mut input = f.import_input(ImportStatus::Draft, &[(0, 1)]);
        input.supplier_id = "missing".to_string();
        let err = imports.create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::SupplierNotFound(_))));

        let mut input = f.import_input(ImportStatus::Draft, &[(0, 1)]);
        input.user_id = "missing".to_string();
        let err = imports.create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::UserNotFound(_))));

        let mut input = f.import_input(ImportStatus::Draft, &[(0, 1), (1, 1)]);
        input.items[1].property_id = "missing".to_string();
        let err = imports.create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::PropertyNotFound(_))));

        assert!(imports.list(&ImportFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_completed_applies_stock() {
        let f = fixture().await;
        f.db.imports()
            .create(&f.import_input(ImportStatus::Completed, &[(0, 2)]))
            .await
            .unwrap();

        assert_eq!(f.quantity(0).await, 12);
        assert!(f.recorder.paths().contains(&INVENTORY_PATH.to_string()));
    }

    #[tokio::test]
    async fn test_process_adds_stock_once() {
        let f = fixture().await;
        let id = pending_import(&f, &[(0, 3), (1, 5)]).await;
        f.recorder.clear();

        let processed = f.db.imports().process(&id, Some(&f.user.id)).await.unwrap();
        assert_eq!(processed.import_status, ImportStatus::Completed);
        assert_eq!(f.quantity(0).await, 13);
        assert_eq!(f.quantity(1).await, 25);

        let err = f.db.imports().process(&id, None).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ImportNotPending { .. })));
        assert_eq!(f.quantity(0).await, 13);

        assert_eq!(
            f.recorder.paths(),
            vec![
                IMPORTS_PATH.to_string(),
                import_path(&id),
                INVENTORY_PATH.to_string()
            ]
        );

        let history = f
            .db
            .audit_log()
            .list_for_entity(AuditEntity::InventoryImport, &id)
            .await
            .unwrap();
        let actions: Vec<_> = history.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::ImportCreated, AuditAction::ImportProcessed]);
        assert_eq!(history[1].details_json().unwrap()["quantity_added"], 8);
    }

    #[tokio::test]
    async fn test_process_requires_pending() {
        let f = fixture().await;
        let draft = f
            .db
            .imports()
            .create(&f.import_input(ImportStatus::Draft, &[(0, 4)]))
            .await
            .unwrap();

        let err = f.db.imports().process(&draft.import.id, None).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ImportNotPending { .. })));
        assert_eq!(f.quantity(0).await, 10);

        let err = f.db.imports().process("missing", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Import record not found: missing");
    }

    #[tokio::test]
    async fn test_update_status_guard() {
        let f = fixture().await;
        let id = pending_import(&f, &[(1, 2)]).await;
        let imports = f.db.imports();

        imports.update_status(&id, ImportStatus::Processing, None).await.unwrap();
        assert_eq!(f.quantity(1).await, 20);

        imports.update_status(&id, ImportStatus::Completed, None).await.unwrap();
        assert_eq!(f.quantity(1).await, 22);

        let err = imports
            .update_status(&id, ImportStatus::Pending, None)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status transition from COMPLETED to PENDING"
        );

        // COMPLETED → CANCELLED is allowed and keeps the received stock
        let cancelled = imports
            .update_status(&id, ImportStatus::Cancelled, None)
            .await
            .unwrap();
        assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);
        assert_eq!(f.quantity(1).await, 22);

        let err = imports
            .update_status(&id, ImportStatus::Completed, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

        let reopened = imports.update_status(&id, ImportStatus::Draft, None).await.unwrap();
        assert_eq!(reopened.import_status, ImportStatus::Draft);
        assert_eq!(reopened.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_cancel_forces_payment_cancelled() {
        let f = fixture().await;
        let id = pending_import(&f, &[(0, 1)]).await;
        let imports = f.db.imports();

        imports
            .update_payment_status(&id, PaymentStatus::PartiallyPaid, None)
            .await
            .unwrap();

        let cancelled = imports.cancel(&id, None).await.unwrap();
        assert_eq!(cancelled.import_status, ImportStatus::Cancelled);
        assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);

        let stored = imports.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Cancelled);

        let err = imports.cancel(&id, None).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::ImportNotCancellable { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_payment_status_missing_import() {
        let f = fixture().await;
        let err = f
            .db
            .imports()
            .update_payment_status("missing", PaymentStatus::Paid, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_details_and_delete() {
        let f = fixture().await;
        let imports = f.db.imports();
        let id = pending_import(&f, &[(0, 1)]).await;

        let updated = imports
            .update_details(&id, Some("PN-2026-777"), None, None)
            .await
            .unwrap();
        assert_eq!(updated.reference.as_deref(), Some("PN-2026-777"));

        // PENDING imports cannot be deleted
        assert!(imports.delete(&id, None).await.is_err());

        imports.cancel(&id, None).await.unwrap();
        assert!(imports.update_details(&id, Some("X"), None, None).await.is_err());

        imports.delete(&id, None).await.unwrap();
        assert!(imports.get_by_id(&id).await.unwrap().is_none());
        assert!(imports.items(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let f = fixture().await;
        let imports = f.db.imports();

        pending_import(&f, &[(0, 1)]).await;
        pending_import(&f, &[(0, 1)]).await;
        imports
            .create(&f.import_input(ImportStatus::Draft, &[(1, 1)]))
            .await
            .unwrap();

        let all = imports.list(&ImportFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let pending = imports
            .list(&ImportFilter {
                import_status: Some(ImportStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        let page = imports
            .list(&ImportFilter {
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);

        let other_supplier = imports
            .list(&ImportFilter {
                supplier_id: Some("other".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(other_supplier.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_process_reports_each_item() {
        let f = fixture().await;
        let a = pending_import(&f, &[(0, 1)]).await;
        let b = pending_import(&f, &[(0, 2)]).await;
        let draft = f
            .db
            .imports()
            .create(&f.import_input(ImportStatus::Draft, &[(0, 100)]))
            .await
            .unwrap()
            .import
            .id;

        let ids = vec![a, draft.clone(), b, "missing".to_string()];
        let report = f.db.imports().bulk_process(&ids, None).await;

        assert!(!report.success);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(report.results.len(), 4);
        assert!(!report.results[1].success);
        assert_eq!(report.results[1].id, draft);
        assert_eq!(
            report.results[3].error.as_deref(),
            Some("Import record not found: missing")
        );

        assert_eq!(f.quantity(0).await, 13);
    }

    #[tokio::test]
    async fn test_bulk_cancel_and_payment() {
        let f = fixture().await;
        let a = pending_import(&f, &[(0, 1)]).await;
        let b = pending_import(&f, &[(1, 1)]).await;
        let imports = f.db.imports();

        let report = imports
            .bulk_update_payment_status(&[a.clone(), b.clone()], PaymentStatus::Paid, None)
            .await;
        assert!(report.success);
        assert_eq!(report.succeeded, 2);

        imports.process(&b, None).await.unwrap();

        let report = imports.bulk_cancel(&[a.clone(), b.clone()], None).await;
        assert_eq!((report.succeeded, report.failed), (1, 1));

        let report = imports
            .bulk_update_status(&[a, b], ImportStatus::Draft, None)
            .await;
        // a: CANCELLED → DRAFT ok, b: COMPLETED → DRAFT rejected
        assert_eq!((report.succeeded, report.failed), (1, 1));
    }

    #[tokio::test]
    async fn test_create_rejects_total_overflow() {
        let f = fixture().await;
        let mut input = f.import_input(ImportStatus::Pending, &[(0, 1_000_000_000_000)]);
        input.items[0].net_price = 100_000_000;

        let err = f.db.imports().create(&input).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { ref field, .. }))
                if field == "total_amount"
        ));
        assert!(f.db.imports().list(&ImportFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_process_rejects_stock_overflow() {
        let f = fixture().await;
        let mut input = f.import_input(ImportStatus::Pending, &[(1, 1), (0, i64::MAX - 5)]);
        input.items[1].net_price = 1;
        input.items[0].net_price = 0;
        let id = f.db.imports().create(&input).await.unwrap().import.id;

        let err = f.db.imports().process(&id, None).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        // the first item's increment is rolled back with the rest
        assert_eq!(f.quantity(0).await, 10);
        assert_eq!(f.quantity(1).await, 20);
        let stored = f.db.imports().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.import_status, ImportStatus::Pending);
    }

    #[tokio::test]
    async fn test_guarded_update_detects_status_change() {
        let f = fixture().await;
        let id = pending_import(&f, &[(0, 2)]).await;

        let mut tx = begin_write(f.db.pool()).await.unwrap();
        let err = set_status_guarded(
            &mut tx,
            &id,
            ImportStatus::Draft,
            ImportStatus::Completed,
            PaymentStatus::Pending,
            Utc::now(),
        )
        .await
        .unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(
            err,
            DbError::Domain(CoreError::ImportStatusChanged { expected: ImportStatus::Draft, .. })
        ));
        let stored = f.db.imports().get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.import_status, ImportStatus::Pending);
    }
}
