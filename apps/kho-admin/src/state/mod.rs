//! # State Module
//!
//! What every admin command runs against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐  │
//! │  │   AdminConfig            │ ─────► │   DbState                    │  │
//! │  │                          │  open  │                              │  │
//! │  │  database.path           │        │  Database (SQLite pool,      │  │
//! │  │  database.max_connections│        │  revalidator)                │  │
//! │  │  admin.actor_id          │        │                              │  │
//! │  │  admin.log               │        │                              │  │
//! │  └──────────────────────────┘        └──────────────────────────────┘  │
//! │                                                                         │
//! │  AdminConfig is read-only after startup; DbState is shared by          │
//! │  reference and the pool handles concurrency.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::{AdminConfig, ConfigError, ConfigResult, DEFAULT_LOG_FILTER};
pub use db::DbState;
