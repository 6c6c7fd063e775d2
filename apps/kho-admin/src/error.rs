//! # API Error Type
//!
//! Unified error type for admin commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kho Admin                              │
//! │                                                                         │
//! │  Command Function  ──  Result<T, ApiError>                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Repository error? ── DbError::Domain(CoreError::...) ───┐              │
//! │         │                                                 │              │
//! │         ▼                                                 ▼              │
//! │  SQL failure? ── DbError::QueryFailed(..) ── logged ──► ApiError         │
//! │         │                                                 │              │
//! │         ▼                                                 ▼              │
//! │  Success ──────────────────────────────────────────► stdout / stderr    │
//! │                                                                         │
//! │  stderr: {"code":"BUSINESS_LOGIC","message":"Import ... must be ..."}  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain failures keep their message since the operator acts on it.
//! Storage failures are logged with full detail and reported generically.

use kho_core::{CoreError, ValidationError};
use kho_db::DbError;
use serde::Serialize;

use crate::state::ConfigError;

/// Error returned from admin commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Import record not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Lifecycle rule rejected the request (422)
    BusinessLogic,

    /// Record changed underneath the request (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(core) => ApiError::from(core),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ImportNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::SupplierNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::PropertyNotFound(_)
            | CoreError::InventoryNotFound(_) => ErrorCode::NotFound,
            CoreError::InvalidStatusTransition { .. }
            | CoreError::ImportNotPending { .. }
            | CoreError::ImportNotCancellable { .. }
            | CoreError::ImportNotEditable { .. }
            | CoreError::ImportNotDeletable { .. } => ErrorCode::BusinessLogic,
            CoreError::ImportStatusChanged { .. } => ErrorCode::Conflict,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
