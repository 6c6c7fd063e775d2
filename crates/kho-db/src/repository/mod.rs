//! # Repository Module
//!
//! Database repository implementations for the back-office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  kho-admin command                                                     │
//! │       │                                                                 │
//! │       │  db.imports().process(id, actor)                               │
//! │       ▼                                                                 │
//! │  ImportRepository                                                      │
//! │  ├── lifecycle rules (kho_core::lifecycle)                             │
//! │  ├── inventory::increment    ─┐                                        │
//! │  ├── audit::insert_entry      ├── same transaction                     │
//! │  └── guarded status UPDATE   ─┘                                        │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  Revalidator::revalidate(paths)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Staff and admin accounts
//! - [`supplier::SupplierRepository`] - Vendors goods are imported from
//! - [`catalog::CatalogRepository`] - Products, properties and their stock rows
//! - [`inventory::InventoryRepository`] - Stock on hand and manual adjustments
//! - [`import::ImportRepository`] - The inventory import lifecycle
//! - [`audit::AuditLogRepository`] - Audit trail queries

pub mod audit;
pub mod catalog;
pub mod import;
pub mod inventory;
pub mod supplier;
pub mod user;

use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::error::DbResult;

/// New UUID v4 primary key.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Opens a transaction that holds the write lock from its first statement.
///
/// A deferred `BEGIN` that reads before writing gets SQLITE_BUSY on the lock
/// upgrade without consulting `busy_timeout`. With `BEGIN IMMEDIATE` a
/// concurrent writer waits for the lock and then reads committed state.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use kho_core::{
        ImportStatus, NewImport, NewImportItem, NewProduct, NewProperty, NewSupplier, NewUser,
        PaymentStatus, ProductDetail, Supplier, User, UserRole,
    };

    use crate::revalidate::RecordingRevalidator;
    use crate::{Database, DbConfig};

    /// In-memory database with one staff user, one supplier and a product
    /// with two properties stocked at 10 and 20.
    pub struct Fixture {
        pub db: Database,
        pub recorder: Arc<RecordingRevalidator>,
        pub user: User,
        pub supplier: Supplier,
        pub product: ProductDetail,
    }

    impl Fixture {
        pub fn property_id(&self, index: usize) -> String {
            self.product.properties[index].id.clone()
        }

        /// Import input with one item per `(property index, quantity)`.
        pub fn import_input(&self, status: ImportStatus, lines: &[(usize, i64)]) -> NewImport {
            NewImport {
                user_id: self.user.id.clone(),
                supplier_id: self.supplier.id.clone(),
                reference: Some("PN-2026-001".to_string()),
                description: None,
                payment_status: PaymentStatus::Pending,
                import_status: status,
                items: lines
                    .iter()
                    .map(|&(index, quantity)| NewImportItem {
                        property_id: self.property_id(index),
                        quantity,
                        net_price: 100_000,
                        warranty_period_days: None,
                        warranty_expiry: None,
                        notes: None,
                    })
                    .collect(),
            }
        }

        pub async fn quantity(&self, index: usize) -> i64 {
            self.db
                .inventory()
                .get_by_property(&self.property_id(index))
                .await
                .unwrap()
                .unwrap()
                .quantity
        }
    }

    pub async fn fixture() -> Fixture {
        let recorder = Arc::new(RecordingRevalidator::new());
        let db = Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .with_revalidator(recorder.clone());

        let user = db
            .users()
            .insert(&NewUser {
                email: "kho@shop.vn".to_string(),
                name: "Nguyễn Thị Lan".to_string(),
                role: UserRole::Staff,
            })
            .await
            .unwrap();

        let supplier = db
            .suppliers()
            .insert(&NewSupplier {
                name: "Công ty May Việt".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let product = db
            .catalog()
            .create_product(&NewProduct {
                name: "Áo thun cổ tròn".to_string(),
                slug: "ao-thun-co-tron".to_string(),
                description: None,
                properties: vec![
                    NewProperty {
                        name: "Đỏ / M".to_string(),
                        sku: "AT-DO-M".to_string(),
                        price: 199_000,
                        initial_quantity: 10,
                    },
                    NewProperty {
                        name: "Đỏ / L".to_string(),
                        sku: "AT-DO-L".to_string(),
                        price: 199_000,
                        initial_quantity: 20,
                    },
                ],
            })
            .await
            .unwrap();

        recorder.clear();

        Fixture {
            db,
            recorder,
            user,
            supplier,
            product,
        }
    }
}
