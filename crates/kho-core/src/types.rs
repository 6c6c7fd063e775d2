//! # Domain Types
//!
//! Core domain types used throughout the back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │   │ InventoryImport │   │      User       │       │
//! │  │  ─────────────  │◄──│  ─────────────  │──►│  ─────────────  │       │
//! │  │  id (UUID)      │   │  import_status  │   │  id (UUID)      │       │
//! │  │  name           │   │  payment_status │   │  email          │       │
//! │  └─────────────────┘   │  total_amount   │   └─────────────────┘       │
//! │                        └────────┬────────┘                              │
//! │                                 │ 1..n                                  │
//! │  ┌─────────────────┐   ┌────────▼────────┐   ┌─────────────────┐       │
//! │  │    Property     │◄──│ InventoryImport │──►│    Inventory    │       │
//! │  │  (variant, SKU) │   │      Item       │   │   quantity      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity is keyed by a UUID v4 string. Enum wire names are
//! SCREAMING_SNAKE_CASE, both in JSON and in the database.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Import Status
// =============================================================================

/// Where an inventory import is in its lifecycle.
///
/// ```text
/// DRAFT ──► PENDING ──► PROCESSING ──► COMPLETED
///   │          │                           │
///   └──────────┴──────► CANCELLED ◄────────┘ (status update only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    /// Being prepared; no stock effect.
    #[default]
    Draft,
    /// Submitted and waiting to be received.
    Pending,
    /// Goods are being checked in.
    Processing,
    /// Stock has been added to inventory.
    Completed,
    Cancelled,
}

impl ImportStatus {
    pub const ALL: [ImportStatus; 5] = [
        ImportStatus::Draft,
        ImportStatus::Pending,
        ImportStatus::Processing,
        ImportStatus::Completed,
        ImportStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Draft => "DRAFT",
            ImportStatus::Pending => "PENDING",
            ImportStatus::Processing => "PROCESSING",
            ImportStatus::Completed => "COMPLETED",
            ImportStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImportStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "import_status".to_string(),
                allowed: ImportStatus::ALL.iter().map(|s| s.to_string()).collect(),
            })
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// How much of an import has been paid to the supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::PartiallyPaid,
        PaymentStatus::Paid,
        PaymentStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::PartiallyPaid => "PARTIALLY_PAID",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "payment_status".to_string(),
                allowed: PaymentStatus::ALL.iter().map(|s| s.to_string()).collect(),
            })
    }
}

// =============================================================================
// Users & Suppliers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    #[default]
    Staff,
    Customer,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Staff, UserRole::Customer];

    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Staff => "STAFF",
            UserRole::Customer => "CUSTOMER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: UserRole::ALL.iter().map(|r| r.to_string()).collect(),
            })
    }
}

/// An account that can create and act on imports.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// A vendor goods are imported from.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Inactive suppliers are hidden from pickers but keep their history.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Catalog: Product, Property, Inventory
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// URL slug on the storefront, e.g. `ao-thun-co-tron`.
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A product variant (attribute combination) that stock is tracked against.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Property {
    pub id: String,
    pub product_id: String,
    /// Attribute combination label, e.g. "Đỏ / XL".
    pub name: String,
    pub sku: String,
    /// Selling price in đồng.
    pub price: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Quantity on hand for one property.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Inventory {
    pub id: String,
    pub property_id: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub properties: Vec<NewProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProperty {
    pub name: String,
    pub sku: String,
    pub price: i64,
    /// Stock on hand when the inventory record is created.
    #[serde(default)]
    pub initial_quantity: i64,
}

/// A product together with its variants.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDetail {
    pub product: Product,
    pub properties: Vec<Property>,
}

// =============================================================================
// Inventory Import
// =============================================================================

/// A batch of inbound stock from one supplier.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryImport {
    pub id: String,
    /// Staff member who recorded the import.
    pub user_id: String,
    pub supplier_id: String,
    /// Supplier invoice or delivery note number.
    pub reference: Option<String>,
    pub description: Option<String>,
    /// Σ quantity × net price, in đồng.
    pub total_amount: i64,
    pub payment_status: PaymentStatus,
    pub import_status: ImportStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryImport {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_dong(self.total_amount)
    }
}

/// One line of an import. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryImportItem {
    pub id: String,
    pub import_id: String,
    pub property_id: String,
    /// Resolved from `property_id` when the import is created.
    pub inventory_id: String,
    pub quantity: i64,
    /// Purchase price per unit, in đồng.
    pub net_price: i64,
    pub warranty_period_days: Option<i64>,
    #[ts(as = "Option<String>")]
    pub warranty_expiry: Option<NaiveDate>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// An import together with its line items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportDetail {
    pub import: InventoryImport,
    pub items: Vec<InventoryImportItem>,
}

/// Input for creating an import.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewImport {
    pub user_id: String,
    pub supplier_id: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub import_status: ImportStatus,
    pub items: Vec<NewImportItem>,
}

impl NewImport {
    /// Sum of all line totals.
    ///
    /// Fails with `OutOfRange` when a line total or the sum overflows.
    pub fn total_amount(&self) -> Result<Money, ValidationError> {
        self.items.iter().try_fold(Money::zero(), |total, item| {
            item.line_total()
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: "total_amount".to_string(),
                    min: 0,
                    max: i64::MAX,
                })
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewImportItem {
    pub property_id: String,
    pub quantity: i64,
    pub net_price: i64,
    #[serde(default)]
    pub warranty_period_days: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub warranty_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewImportItem {
    /// Quantity × net price, `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        Money::from_dong(self.net_price).checked_multiply_quantity(self.quantity)
    }
}

/// Listing filter for the admin imports table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImportFilter {
    pub import_status: Option<ImportStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub supplier_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ImportFilter {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

// =============================================================================
// Bulk Operations
// =============================================================================

/// Outcome for one id of a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkItemResult {
    pub id: String,
    pub success: bool,
    pub error: Option<String>,
}

impl BulkItemResult {
    pub fn ok(id: impl Into<String>) -> Self {
        BulkItemResult {
            id: id.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        BulkItemResult {
            id: id.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Aggregate report of a bulk request. Items are independent: a failure
/// never rolls back the ones that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkOperationReport {
    /// False whenever at least one item failed.
    pub success: bool,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<BulkItemResult>,
}

impl BulkOperationReport {
    pub fn from_results(results: Vec<BulkItemResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        let failed = results.len() - succeeded;

        BulkOperationReport {
            success: failed == 0,
            succeeded,
            failed,
            results,
        }
    }
}

// =============================================================================
// Audit Log
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    ImportCreated,
    ImportProcessed,
    ImportStatusUpdated,
    ImportPaymentUpdated,
    ImportCancelled,
    ImportUpdated,
    ImportDeleted,
    InventoryAdjusted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEntity {
    InventoryImport,
    Inventory,
}

/// A row of the admin audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AuditLogEntry {
    pub id: String,
    /// Acting user, if known.
    pub user_id: Option<String>,
    pub action: AuditAction,
    pub entity_type: AuditEntity,
    pub entity_id: String,
    /// JSON document describing the change.
    pub details: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Parses `details` back into JSON; `None` when absent or malformed.
    pub fn details_json(&self) -> Option<serde_json::Value> {
        self.details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
