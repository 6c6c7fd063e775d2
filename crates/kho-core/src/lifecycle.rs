//! # Import Lifecycle Rules
//!
//! Pure status rules for inventory imports. `kho-db` calls these before it
//! touches any row, and re-checks the status inside its guarded UPDATEs.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Inventory Import Lifecycle                         │
//! │                                                                         │
//! │   create()                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │   DRAFT ───────► PENDING ───process()───► COMPLETED                     │
//! │     │  ▲            │  \                      ▲    │                    │
//! │     │  │            │   └──► PROCESSING ──────┘    │ update_status      │
//! │     │  │            │                              │ (no stock reversal)│
//! │     │  │ update     ▼ cancel()                     ▼                    │
//! │     │  └──status── CANCELLED ◄──────────────────────                    │
//! │     └──cancel()───────┘                                                 │
//! │                                                                         │
//! │  Transition guard (update_status):                                      │
//! │    COMPLETED → only CANCELLED                                           │
//! │    CANCELLED → only DRAFT                                               │
//! │    everything else is accepted                                          │
//! │                                                                         │
//! │  Stock is added exactly when a DRAFT/PENDING/PROCESSING import          │
//! │  becomes COMPLETED.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::{ImportStatus, PaymentStatus};

/// Checks a requested `update_status` transition.
///
/// ## Example
/// ```rust
/// use kho_core::{lifecycle, ImportStatus};
///
/// assert!(lifecycle::check_transition(ImportStatus::Draft, ImportStatus::Completed).is_ok());
/// assert!(lifecycle::check_transition(ImportStatus::Cancelled, ImportStatus::Pending).is_err());
/// ```
pub fn check_transition(current: ImportStatus, target: ImportStatus) -> CoreResult<()> {
    let allowed = match current {
        ImportStatus::Completed => target == ImportStatus::Cancelled,
        ImportStatus::Cancelled => target == ImportStatus::Draft,
        _ => true,
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::InvalidStatusTransition {
            from: current,
            to: target,
        })
    }
}

/// Whether moving `current` → `target` must add the items to inventory.
pub fn requires_stock_increment(current: ImportStatus, target: ImportStatus) -> bool {
    target == ImportStatus::Completed
        && matches!(
            current,
            ImportStatus::Draft | ImportStatus::Pending | ImportStatus::Processing
        )
}

/// `process` only runs against PENDING imports.
pub fn ensure_processable(import_id: &str, current: ImportStatus) -> CoreResult<()> {
    if current == ImportStatus::Pending {
        Ok(())
    } else {
        Err(CoreError::ImportNotPending {
            import_id: import_id.to_string(),
            current,
        })
    }
}

/// Statuses from which `cancel` is allowed.
pub const CANCELLABLE: [ImportStatus; 2] = [ImportStatus::Draft, ImportStatus::Pending];

pub fn ensure_cancellable(import_id: &str, current: ImportStatus) -> CoreResult<()> {
    if CANCELLABLE.contains(&current) {
        Ok(())
    } else {
        Err(CoreError::ImportNotCancellable {
            import_id: import_id.to_string(),
            current,
        })
    }
}

/// Reference and description can change until the goods are being received.
pub fn ensure_editable(import_id: &str, current: ImportStatus) -> CoreResult<()> {
    if matches!(current, ImportStatus::Draft | ImportStatus::Pending) {
        Ok(())
    } else {
        Err(CoreError::ImportNotEditable {
            import_id: import_id.to_string(),
            current,
        })
    }
}

/// Only imports that never touched stock may be deleted.
pub fn ensure_deletable(import_id: &str, current: ImportStatus) -> CoreResult<()> {
    if matches!(current, ImportStatus::Draft | ImportStatus::Cancelled) {
        Ok(())
    } else {
        Err(CoreError::ImportNotDeletable {
            import_id: import_id.to_string(),
            current,
        })
    }
}

/// Payment status that accompanies a move to `target`.
///
/// Cancelling always cancels the payment; re-opening a cancelled import as a
/// draft resets the payment to PENDING. Other moves keep the payment as is.
pub fn payment_status_for(
    current_payment: PaymentStatus,
    current: ImportStatus,
    target: ImportStatus,
) -> PaymentStatus {
    match (current, target) {
        (_, ImportStatus::Cancelled) => PaymentStatus::Cancelled,
        (ImportStatus::Cancelled, ImportStatus::Draft)
            if current_payment == PaymentStatus::Cancelled =>
        {
            PaymentStatus::Pending
        }
        _ => current_payment,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_only_to_cancelled() {
        for target in ImportStatus::ALL {
            let result = check_transition(ImportStatus::Completed, target);
            assert_eq!(result.is_ok(), target == ImportStatus::Cancelled, "{target}");
        }
    }

    #[test]
    fn test_cancelled_only_to_draft() {
        for target in ImportStatus::ALL {
            let result = check_transition(ImportStatus::Cancelled, target);
            assert_eq!(result.is_ok(), target == ImportStatus::Draft, "{target}");
        }
    }

    #[test]
    fn test_other_transitions_are_permitted() {
        let open = [
            ImportStatus::Draft,
            ImportStatus::Pending,
            ImportStatus::Processing,
        ];
        for current in open {
            for target in ImportStatus::ALL {
                assert!(check_transition(current, target).is_ok(), "{current} -> {target}");
            }
        }
    }

    #[test]
    fn test_transition_error_message() {
        let err = check_transition(ImportStatus::Cancelled, ImportStatus::Pending).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status transition from CANCELLED to PENDING"
        );
    }

    #[test]
    fn test_requires_stock_increment() {
        assert!(requires_stock_increment(ImportStatus::Draft, ImportStatus::Completed));
        assert!(requires_stock_increment(ImportStatus::Pending, ImportStatus::Completed));
        assert!(requires_stock_increment(ImportStatus::Processing, ImportStatus::Completed));
        assert!(!requires_stock_increment(ImportStatus::Completed, ImportStatus::Completed));
        assert!(!requires_stock_increment(ImportStatus::Cancelled, ImportStatus::Completed));
        assert!(!requires_stock_increment(ImportStatus::Pending, ImportStatus::Processing));
    }

    #[test]
    fn test_processable_only_when_pending() {
        assert!(ensure_processable("i", ImportStatus::Pending).is_ok());
        for status in [
            ImportStatus::Draft,
            ImportStatus::Processing,
            ImportStatus::Completed,
            ImportStatus::Cancelled,
        ] {
            assert!(matches!(
                ensure_processable("i", status),
                Err(CoreError::ImportNotPending { .. })
            ));
        }
    }

    #[test]
    fn test_cancellable() {
        assert!(ensure_cancellable("i", ImportStatus::Draft).is_ok());
        assert!(ensure_cancellable("i", ImportStatus::Pending).is_ok());
        assert!(ensure_cancellable("i", ImportStatus::Processing).is_err());
        assert!(ensure_cancellable("i", ImportStatus::Completed).is_err());
        assert!(ensure_cancellable("i", ImportStatus::Cancelled).is_err());
    }

    #[test]
    fn test_editable_and_deletable() {
        assert!(ensure_editable("i", ImportStatus::Pending).is_ok());
        assert!(ensure_editable("i", ImportStatus::Completed).is_err());

        assert!(ensure_deletable("i", ImportStatus::Draft).is_ok());
        assert!(ensure_deletable("i", ImportStatus::Cancelled).is_ok());
        assert!(ensure_deletable("i", ImportStatus::Pending).is_err());
        assert!(ensure_deletable("i", ImportStatus::Completed).is_err());
    }

    #[test]
    fn test_payment_status_follows_cancellation() {
        assert_eq!(
            payment_status_for(PaymentStatus::Paid, ImportStatus::Pending, ImportStatus::Cancelled),
            PaymentStatus::Cancelled
        );
        assert_eq!(
            payment_status_for(
                PaymentStatus::Cancelled,
                ImportStatus::Cancelled,
                ImportStatus::Draft
            ),
            PaymentStatus::Pending
        );
        assert_eq!(
            payment_status_for(
                PaymentStatus::PartiallyPaid,
                ImportStatus::Draft,
                ImportStatus::Pending
            ),
            PaymentStatus::PartiallyPaid
        );
    }
}
