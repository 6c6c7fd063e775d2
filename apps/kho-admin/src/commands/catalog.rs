//! # Catalog Commands
//!
//! Users, suppliers, products and stock: the records imports point at.

use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::DbState;
use kho_core::validation::validate_uuid;
use kho_core::{
    AuditLogEntry, Inventory, NewProduct, NewSupplier, NewUser, Product, ProductDetail, Supplier,
    User,
};

// =============================================================================
// Users
// =============================================================================

pub async fn create_user(db: &DbState, input: &NewUser) -> Result<User, ApiError> {
    debug!(email = %input.email, role = %input.role, "create_user command");
    Ok(db.inner().users().insert(input).await?)
}

pub async fn list_users(db: &DbState) -> Result<Vec<User>, ApiError> {
    Ok(db.inner().users().list().await?)
}

// =============================================================================
// Suppliers
// =============================================================================

pub async fn create_supplier(db: &DbState, input: &NewSupplier) -> Result<Supplier, ApiError> {
    debug!(name = %input.name, "create_supplier command");
    Ok(db.inner().suppliers().insert(input).await?)
}

pub async fn list_suppliers(db: &DbState, include_inactive: bool) -> Result<Vec<Supplier>, ApiError> {
    Ok(db.inner().suppliers().list(include_inactive).await?)
}

/// Replaces a supplier's editable fields.
pub async fn update_supplier(
    db: &DbState,
    id: &str,
    input: &NewSupplier,
) -> Result<Supplier, ApiError> {
    debug!(id = %id, "update_supplier command");
    validate_uuid("supplier_id", id)?;

    Ok(db.inner().suppliers().update(id, input).await?)
}

pub async fn deactivate_supplier(db: &DbState, id: &str) -> Result<(), ApiError> {
    validate_uuid("supplier_id", id)?;

    db.inner().suppliers().deactivate(id).await?;
    info!(id = %id, "Supplier deactivated");
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

/// Creates a product, its properties and their inventory rows in one go.
pub async fn create_product(db: &DbState, input: &NewProduct) -> Result<ProductDetail, ApiError> {
    debug!(
        slug = %input.slug,
        properties = input.properties.len(),
        "create_product command"
    );
    Ok(db.inner().catalog().create_product(input).await?)
}

pub async fn get_product(db: &DbState, id: &str) -> Result<ProductDetail, ApiError> {
    validate_uuid("product_id", id)?;

    db.inner()
        .catalog()
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", id))
}

pub async fn list_products(db: &DbState) -> Result<Vec<Product>, ApiError> {
    Ok(db.inner().catalog().list_products().await?)
}

// =============================================================================
// Inventory
// =============================================================================

pub async fn list_inventory(db: &DbState) -> Result<Vec<Inventory>, ApiError> {
    Ok(db.inner().inventory().list().await?)
}

/// Looks a property up by id, or by SKU when `property` is not a UUID.
pub async fn get_inventory(db: &DbState, property: &str) -> Result<Inventory, ApiError> {
    let property_id = resolve_property(db, property).await?;

    db.inner()
        .inventory()
        .get_by_property(&property_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Inventory", property))
}

/// Manual stock correction by `delta` units.
pub async fn adjust_inventory(
    db: &DbState,
    property: &str,
    delta: i64,
    reason: Option<&str>,
    actor: Option<&str>,
) -> Result<Inventory, ApiError> {
    debug!(property = %property, delta, "adjust_inventory command");
    let property_id = resolve_property(db, property).await?;

    Ok(db
        .inner()
        .inventory()
        .adjust(&property_id, delta, reason, actor)
        .await?)
}

async fn resolve_property(db: &DbState, property: &str) -> Result<String, ApiError> {
    let catalog = db.inner().catalog();

    let found = if validate_uuid("property_id", property).is_ok() {
        catalog.get_property(property).await?
    } else {
        catalog.get_property_by_sku(property).await?
    };

    found
        .map(|p| p.id)
        .ok_or_else(|| ApiError::not_found("Property", property))
}

// =============================================================================
// Audit
// =============================================================================

pub async fn recent_activity(db: &DbState, limit: i64) -> Result<Vec<AuditLogEntry>, ApiError> {
    Ok(db.inner().audit_log().list_recent(limit).await?)
}
