//! # Kho Admin Library
//!
//! Command layer of the Kho back-office. The `kho-admin` binary is a clap
//! front end over these functions; tests call them directly.
//!
//! ## Module Organization
//! ```text
//! kho_admin/
//! ├── lib.rs          ◄─── You are here (logging setup, output helpers)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── kho.toml + KHO_* environment
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── imports.rs  ◄─── Import lifecycle commands
//! │   └── catalog.rs  ◄─── Users, suppliers, products, stock
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! 1. Load `AdminConfig` (file, then environment, then CLI flags)
//! 2. Initialize tracing with the configured filter
//! 3. Open the database & run migrations (`DbState::open`)
//! 4. Run one command, print its result as JSON

pub mod commands;
pub mod error;
pub mod state;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use error::ApiError;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages (wins over the config value)
/// - `KHO_LOG=kho=trace` - Same, via the admin config
/// - Default: `info,kho=debug,sqlx=warn`
///
/// Logs go to stderr so stdout stays parseable JSON.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Renders a command result the way the CLI prints it.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::internal(format!("Failed to serialize output: {}", e)))
}
