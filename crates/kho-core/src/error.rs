//! # Error Types
//!
//! Domain-specific error types for kho-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kho-core errors (this file)                                           │
//! │  ├── CoreError        - Lifecycle and lookup failures                  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kho-db errors (separate crate)                                        │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  kho-admin errors                                                      │
//! │  └── ApiError         - What the admin UI sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Admin UI     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are shown verbatim in admin toasts, so they name the record and
//! the offending status.

use thiserror::Error;

use crate::types::ImportStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and failed lookups.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The import id does not exist.
    #[error("Import record not found: {0}")]
    ImportNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// The property exists but has no inventory record to receive stock.
    #[error("Inventory record not found for property: {0}")]
    InventoryNotFound(String),

    /// Rejected by the status transition guard.
    ///
    /// ## When This Occurs
    /// - COMPLETED → anything other than CANCELLED
    /// - CANCELLED → anything other than DRAFT
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ImportStatus, to: ImportStatus },

    /// `process` requires a PENDING import.
    #[error("Import {import_id} must be PENDING to be processed (current: {current})")]
    ImportNotPending {
        import_id: String,
        current: ImportStatus,
    },

    /// Cancellation is limited to DRAFT and PENDING imports.
    #[error("Import {import_id} cannot be cancelled in status {current}")]
    ImportNotCancellable {
        import_id: String,
        current: ImportStatus,
    },

    /// Reference/description edits are limited to DRAFT and PENDING imports.
    #[error("Import {import_id} cannot be edited in status {current}")]
    ImportNotEditable {
        import_id: String,
        current: ImportStatus,
    },

    /// Deletion is limited to DRAFT and CANCELLED imports.
    #[error("Import {import_id} cannot be deleted in status {current}")]
    ImportNotDeletable {
        import_id: String,
        current: ImportStatus,
    },

    /// The status changed between the read and the guarded update.
    ///
    /// ## When This Occurs
    /// Two admins act on the same import at once; the second request loses.
    #[error("Import {import_id} was modified concurrently, expected status {expected}")]
    ImportStatusChanged {
        import_id: String,
        expected: ImportStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for the "record does not exist" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ImportNotFound(_)
                | CoreError::UserNotFound(_)
                | CoreError::SupplierNotFound(_)
                | CoreError::ProductNotFound(_)
                | CoreError::PropertyNotFound(_)
                | CoreError::InventoryNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any database work starts.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that may not be set together.
    #[error("{first} and {second} cannot both be set")]
    MutuallyExclusive { first: String, second: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ImportNotFound("imp-1".to_string());
        assert_eq!(err.to_string(), "Import record not found: imp-1");

        let err = CoreError::InvalidStatusTransition {
            from: ImportStatus::Completed,
            to: ImportStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "Invalid status transition from COMPLETED to PENDING"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::MutuallyExclusive {
            first: "warranty_period_days".to_string(),
            second: "warranty_expiry".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "warranty_period_days and warranty_expiry cannot both be set"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(!core_err.is_not_found());
    }

    #[test]
    fn test_not_found_family() {
        assert!(CoreError::SupplierNotFound("s".into()).is_not_found());
        assert!(CoreError::InventoryNotFound("p".into()).is_not_found());
        assert!(!CoreError::ImportNotPending {
            import_id: "i".into(),
            current: ImportStatus::Draft,
        }
        .is_not_found());
    }
}
