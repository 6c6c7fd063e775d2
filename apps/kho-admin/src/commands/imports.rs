//! # Import Commands
//!
//! Admin actions on inventory imports.
//!
//! ## Lifecycle Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Import Lifecycle (admin view)                        │
//! │                                                                         │
//! │  create_import ──► DRAFT ──update_import_status──► PENDING              │
//! │                      │                               │                  │
//! │                      │                        process_import            │
//! │                      │                               │                  │
//! │                      │                               ▼                  │
//! │                      │                          COMPLETED               │
//! │                      │                      (stock += quantity)         │
//! │                      │                                                  │
//! │                      └──── cancel_import ◄── PENDING                    │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                 CANCELLED (payment forced to CANCELLED)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-id commands reject malformed ids before touching the database.
//! Bulk commands pass every id through; a malformed one shows up as a
//! failed row in the report.

use std::time::Instant;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use kho_core::validation::validate_uuid;
use kho_core::{
    AuditEntity, AuditLogEntry, BulkOperationReport, ImportDetail, ImportFilter, ImportStatus,
    InventoryImport, NewImport, PaymentStatus,
};

/// Creates an import with its items.
///
/// ## Returns
/// The stored import and items, with `total_amount` computed.
pub async fn create_import(db: &DbState, input: &NewImport) -> Result<ImportDetail, ApiError> {
    debug!(
        supplier_id = %input.supplier_id,
        items = input.items.len(),
        "create_import command"
    );

    let detail = db.inner().imports().create(input).await?;

    info!(
        import_id = %detail.import.id,
        total = %detail.import.total(),
        status = %detail.import.import_status,
        "Import created"
    );

    Ok(detail)
}

pub async fn get_import(db: &DbState, id: &str) -> Result<ImportDetail, ApiError> {
    debug!(id = %id, "get_import command");
    validate_uuid("import_id", id)?;

    Ok(db.inner().imports().get(id).await?)
}

/// Lists imports, newest first.
pub async fn list_imports(
    db: &DbState,
    filter: &ImportFilter,
) -> Result<Vec<InventoryImport>, ApiError> {
    debug!(?filter, "list_imports command");

    if let Some(supplier_id) = &filter.supplier_id {
        validate_uuid("supplier_id", supplier_id)?;
    }

    Ok(db.inner().imports().list(filter).await?)
}

/// Receives a PENDING import: adds every item to stock and marks it COMPLETED.
pub async fn process_import(
    db: &DbState,
    id: &str,
    actor: Option<&str>,
) -> Result<InventoryImport, ApiError> {
    debug!(id = %id, "process_import command");
    validate_uuid("import_id", id)?;

    Ok(db.inner().imports().process(id, actor).await?)
}

pub async fn update_import_status(
    db: &DbState,
    id: &str,
    status: ImportStatus,
    actor: Option<&str>,
) -> Result<InventoryImport, ApiError> {
    debug!(id = %id, %status, "update_import_status command");
    validate_uuid("import_id", id)?;

    Ok(db.inner().imports().update_status(id, status, actor).await?)
}

pub async fn update_payment_status(
    db: &DbState,
    id: &str,
    status: PaymentStatus,
    actor: Option<&str>,
) -> Result<InventoryImport, ApiError> {
    debug!(id = %id, %status, "update_payment_status command");
    validate_uuid("import_id", id)?;

    Ok(db
        .inner()
        .imports()
        .update_payment_status(id, status, actor)
        .await?)
}

pub async fn cancel_import(
    db: &DbState,
    id: &str,
    actor: Option<&str>,
) -> Result<InventoryImport, ApiError> {
    debug!(id = %id, "cancel_import command");
    validate_uuid("import_id", id)?;

    Ok(db.inner().imports().cancel(id, actor).await?)
}

/// Edits reference and/or description. `None` leaves a field unchanged.
pub async fn update_import_details(
    db: &DbState,
    id: &str,
    reference: Option<&str>,
    description: Option<&str>,
    actor: Option<&str>,
) -> Result<InventoryImport, ApiError> {
    debug!(id = %id, "update_import_details command");
    validate_uuid("import_id", id)?;

    if reference.is_none() && description.is_none() {
        return Err(ApiError::validation(
            "Nothing to update: pass a reference or a description",
        ));
    }

    Ok(db
        .inner()
        .imports()
        .update_details(id, reference, description, actor)
        .await?)
}

pub async fn delete_import(db: &DbState, id: &str, actor: Option<&str>) -> Result<(), ApiError> {
    debug!(id = %id, "delete_import command");
    validate_uuid("import_id", id)?;

    db.inner().imports().delete(id, actor).await?;
    Ok(())
}

/// Audit trail of one import, oldest first.
pub async fn import_history(db: &DbState, id: &str) -> Result<Vec<AuditLogEntry>, ApiError> {
    validate_uuid("import_id", id)?;

    Ok(db
        .inner()
        .audit_log()
        .list_for_entity(AuditEntity::InventoryImport, id)
        .await?)
}

// =============================================================================
// Bulk Commands
// =============================================================================

fn ensure_ids(ids: &[String]) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Err(ApiError::validation("At least one import id is required"));
    }
    Ok(())
}

fn log_report(operation: &str, report: &BulkOperationReport, start: Instant) {
    info!(
        operation,
        succeeded = report.succeeded,
        failed = report.failed,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Bulk command complete"
    );
}

pub async fn bulk_process_imports(
    db: &DbState,
    ids: &[String],
    actor: Option<&str>,
) -> Result<BulkOperationReport, ApiError> {
    ensure_ids(ids)?;
    let start = Instant::now();

    let report = db.inner().imports().bulk_process(ids, actor).await;
    log_report("process", &report, start);

    Ok(report)
}

pub async fn bulk_cancel_imports(
    db: &DbState,
    ids: &[String],
    actor: Option<&str>,
) -> Result<BulkOperationReport, ApiError> {
    ensure_ids(ids)?;
    let start = Instant::now();

    let report = db.inner().imports().bulk_cancel(ids, actor).await;
    log_report("cancel", &report, start);

    Ok(report)
}

pub async fn bulk_update_import_status(
    db: &DbState,
    ids: &[String],
    status: ImportStatus,
    actor: Option<&str>,
) -> Result<BulkOperationReport, ApiError> {
    ensure_ids(ids)?;
    let start = Instant::now();

    let report = db
        .inner()
        .imports()
        .bulk_update_status(ids, status, actor)
        .await;
    log_report("update_status", &report, start);

    Ok(report)
}

pub async fn bulk_update_payment_status(
    db: &DbState,
    ids: &[String],
    status: PaymentStatus,
    actor: Option<&str>,
) -> Result<BulkOperationReport, ApiError> {
    ensure_ids(ids)?;
    let start = Instant::now();

    let report = db
        .inner()
        .imports()
        .bulk_update_payment_status(ids, status, actor)
        .await;
    log_report("update_payment_status", &report, start);

    Ok(report)
}
