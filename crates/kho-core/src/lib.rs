//! # kho-core: Pure Business Logic for the Kho back-office
//!
//! Domain types and rules for suppliers, catalog properties, inventory and
//! the inventory import lifecycle. Zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Kho Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  kho-admin (commands + CLI)                     │   │
//! │  │   create_import, process_import, cancel_import, bulk_*, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ★ kho-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ lifecycle │  │ validation│  │   │
//! │  │   │  Import   │  │   Money   │  │ transition│  │   rules   │  │   │
//! │  │   │ Inventory │  │   (VND)   │  │  guards   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     kho-db (Database Layer)                     │   │
//! │  │            SQLite queries, migrations, transactions             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (InventoryImport, Inventory, Supplier, ...)
//! - [`money`] - Money in integer đồng
//! - [`lifecycle`] - Import status transition rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kho_core::lifecycle;
//! use kho_core::ImportStatus;
//!
//! // A completed import may only be cancelled
//! assert!(lifecycle::check_transition(ImportStatus::Completed, ImportStatus::Cancelled).is_ok());
//! assert!(lifecycle::check_transition(ImportStatus::Completed, ImportStatus::Draft).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size when listing imports.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page a single listing may return.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Maximum length of an import reference string (e.g. supplier invoice no.).
pub const MAX_REFERENCE_LEN: usize = 100;

/// Maximum length of free-text descriptions and notes.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
