//! # Validation Module
//!
//! Input validation for admin forms and CLI input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form (TypeScript)                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command (Rust)                                               │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on statuses                                     │
//! │  ├── UNIQUE constraints (email, sku, slug)                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kho_core::validation::{validate_quantity, validate_net_price};
//!
//! assert!(validate_quantity(3).is_ok());
//! assert!(validate_net_price(-1).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{NewImport, NewImportItem, NewProduct, NewSupplier, NewUser};
use crate::{MAX_DESCRIPTION_LEN, MAX_REFERENCE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn validate_optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

/// Validates a display name (product, property, supplier, user).
///
/// Vietnamese names are counted in characters, not bytes:
/// "Áo thun cổ tròn" is 15 characters.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    validate_required_text(field, name, 200)
}

/// Validates a SKU.
///
/// ## Rules
/// - 1 to 50 characters
/// - ASCII letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use kho_core::validation::validate_sku;
///
/// assert!(validate_sku("AO-THUN-DO-XL").is_ok());
/// assert!(validate_sku("áo").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    validate_required_text("sku", sku, 50)?;

    if !sku
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a storefront slug: lowercase ASCII words joined by hyphens.
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    validate_required_text("slug", slug, 200)?;

    let well_formed = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must be lowercase words separated by single hyphens".to_string(),
        });
    }

    Ok(())
}

/// Minimal email shape check: `local@domain.tld`.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required_text("email", email, 254)?;

    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates an import reference (supplier invoice/delivery note number).
pub fn validate_reference(reference: Option<&str>) -> ValidationResult<()> {
    validate_optional_text("reference", reference, MAX_REFERENCE_LEN)
}

/// Validates a free-text description or note.
pub fn validate_description(field: &str, description: Option<&str>) -> ValidationResult<()> {
    validate_optional_text(field, description, MAX_DESCRIPTION_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Quantity received on an import line. Must be positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Net purchase price in đồng. Zero is allowed (free samples).
pub fn validate_net_price(dong: i64) -> ValidationResult<()> {
    if dong < 0 {
        return Err(ValidationError::OutOfRange {
            field: "net_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Selling price of a property in đồng.
pub fn validate_price(dong: i64) -> ValidationResult<()> {
    if dong < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Warranty is either a period in days or a fixed expiry date, never both.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use kho_core::validation::validate_warranty;
///
/// assert!(validate_warranty(Some(365), None).is_ok());
/// assert!(validate_warranty(None, NaiveDate::from_ymd_opt(2027, 1, 1)).is_ok());
/// assert!(validate_warranty(Some(365), NaiveDate::from_ymd_opt(2027, 1, 1)).is_err());
/// assert!(validate_warranty(Some(0), None).is_err());
/// ```
pub fn validate_warranty(
    period_days: Option<i64>,
    expiry: Option<NaiveDate>,
) -> ValidationResult<()> {
    if period_days.is_some() && expiry.is_some() {
        return Err(ValidationError::MutuallyExclusive {
            first: "warranty_period_days".to_string(),
            second: "warranty_expiry".to_string(),
        });
    }

    if let Some(days) = period_days {
        if days <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "warranty_period_days".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use kho_core::validation::validate_uuid;
///
/// assert!(validate_uuid("import_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("import_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

pub fn validate_new_import_item(item: &NewImportItem) -> ValidationResult<()> {
    if item.property_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "property_id".to_string(),
        });
    }
    validate_quantity(item.quantity)?;
    validate_net_price(item.net_price)?;
    validate_warranty(item.warranty_period_days, item.warranty_expiry)?;
    validate_description("notes", item.notes.as_deref())?;
    Ok(())
}

/// Validates a whole import before any lookups run.
pub fn validate_new_import(input: &NewImport) -> ValidationResult<()> {
    if input.user_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "user_id".to_string(),
        });
    }
    if input.supplier_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "supplier_id".to_string(),
        });
    }
    validate_reference(input.reference.as_deref())?;
    validate_description("description", input.description.as_deref())?;

    if input.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    input.items.iter().try_for_each(validate_new_import_item)?;
    input.total_amount().map(|_| ())
}

pub fn validate_new_supplier(input: &NewSupplier) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    if let Some(email) = input.email.as_deref() {
        validate_email(email)?;
    }
    validate_description("address", input.address.as_deref())
}

pub fn validate_new_user(input: &NewUser) -> ValidationResult<()> {
    validate_email(&input.email)?;
    validate_name("name", &input.name)
}

pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_slug(&input.slug)?;
    validate_description("description", input.description.as_deref())?;

    if input.properties.is_empty() {
        return Err(ValidationError::Required {
            field: "properties".to_string(),
        });
    }

    for property in &input.properties {
        validate_name("property name", &property.name)?;
        validate_sku(&property.sku)?;
        validate_price(property.price)?;
        if property.initial_quantity < 0 {
            return Err(ValidationError::OutOfRange {
                field: "initial_quantity".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
