//! # kho-db: Database Layer for the Kho back-office
//!
//! SQLite storage for users, suppliers, the catalog, inventory, inventory
//! imports and the audit trail, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kho Data Flow                                    │
//! │                                                                         │
//! │  kho-admin command (import process <id>)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kho-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (import.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ImportRepo    │    │ 001_initial  │  │   │
//! │  │   │ Revalidator   │    │ InventoryRepo │    │   _schema    │  │   │
//! │  │   │               │    │ CatalogRepo.. │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (kho.db)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`revalidate`] - Cache revalidation hook called after each mutation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kho_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kho.db")).await?;
//!
//! let detail = db.imports().create(&input).await?;
//! db.imports().process(&detail.import.id, Some(&staff_id)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod revalidate;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use revalidate::{RecordingRevalidator, Revalidator, TracingRevalidator};

pub use repository::audit::AuditLogRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::import::ImportRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;
