//! # Admin Commands
//!
//! Every action the back-office can take, one async function each.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── imports.rs  ◄─── Import lifecycle, edits, bulk actions, history
//! └── catalog.rs  ◄─── Users, suppliers, products, stock, recent activity
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Admin Command Flow                                   │
//! │                                                                         │
//! │  kho-admin import process 6f1c...                                      │
//! │         │                                                               │
//! │         │ (clap parses args, main.rs opens DbState)                     │
//! │         ▼                                                               │
//! │  pub async fn process_import(                                           │
//! │      db: &DbState,          ◄── shared database handle                  │
//! │      id: &str,              ◄── validated as a UUID                     │
//! │      actor: Option<&str>,   ◄── recorded in the audit trail             │
//! │  ) -> Result<InventoryImport, ApiError>                                 │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: pretty JSON of the result / stderr: ApiError JSON              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod imports;
