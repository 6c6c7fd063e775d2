//! # Cache Revalidation
//!
//! Admin pages that render imports and stock are cached by the web layer.
//! After every successful mutation the repositories call a [`Revalidator`]
//! with the paths whose cached render is now stale.
//!
//! ```text
//! ImportRepository::process(id)
//!     │  COMMIT
//!     ▼
//! revalidator.revalidate("/admin/inventory-imports")
//! revalidator.revalidate("/admin/inventory-imports/{id}")
//! revalidator.revalidate("/admin/inventory")
//! ```
//!
//! Revalidation never fails the operation: it runs after commit and has no
//! return value.

use std::fmt::Debug;
use std::sync::Mutex;
use tracing::info;

/// Listing of all imports.
pub const IMPORTS_PATH: &str = "/admin/inventory-imports";

/// Stock overview.
pub const INVENTORY_PATH: &str = "/admin/inventory";

/// Detail page of one import.
pub fn import_path(import_id: &str) -> String {
    format!("{IMPORTS_PATH}/{import_id}")
}

/// Receives cache invalidation requests (implemented by the web integration).
pub trait Revalidator: Send + Sync + Debug {
    fn revalidate(&self, path: &str);
}

/// Default revalidator: records the request in the log only.
#[derive(Debug, Default)]
pub struct TracingRevalidator;

impl Revalidator for TracingRevalidator {
    fn revalidate(&self, path: &str) {
        info!(path, "Revalidating admin path");
    }
}

/// Collects every requested path. Used by tests to assert side effects.
#[derive(Debug, Default)]
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths requested so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.clear();
        }
    }
}

impl Revalidator for RecordingRevalidator {
    fn revalidate(&self, path: &str) {
        if let Ok(mut paths) = self.paths.lock() {
            paths.push(path.to_string());
        }
    }
}
