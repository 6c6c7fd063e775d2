//! # Supplier Repository
//!
//! Vendors goods are imported from. Suppliers are never hard-deleted:
//! imports keep pointing at them, so `deactivate` only hides them from
//! pickers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::generate_id;
use crate::error::{DbError, DbResult};
use kho_core::validation::validate_new_supplier;
use kho_core::{NewSupplier, Supplier};

const SUPPLIER_COLUMNS: &str =
    "id, name, contact_name, phone, email, address, is_active, created_at, updated_at";

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    pub async fn insert(&self, input: &NewSupplier) -> DbResult<Supplier> {
        validate_new_supplier(input)?;

        let now = Utc::now();
        let supplier = Supplier {
            id: generate_id(),
            name: input.name.trim().to_string(),
            contact_name: input.contact_name.clone(),
            phone: input.phone.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, name, contact_name, phone, email, address,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact_name)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(supplier.is_active)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    /// Lists suppliers by name. Inactive ones only when asked for.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers
             WHERE (?1 OR is_active = 1)
             ORDER BY name"
        ))
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    /// Replaces the editable fields of a supplier.
    pub async fn update(&self, id: &str, input: &NewSupplier) -> DbResult<Supplier> {
        validate_new_supplier(input)?;

        debug!(id = %id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                name = ?2,
                contact_name = ?3,
                phone = ?4,
                email = ?5,
                address = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.contact_name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Supplier", id))
    }

    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating supplier");

        let result = sqlx::query(
            "UPDATE suppliers SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use kho_core::NewSupplier;

    fn supplier(name: &str) -> NewSupplier {
        NewSupplier {
            name: name.to_string(),
            phone: Some("028 3823 0000".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_update_and_deactivate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let a = repo.insert(&supplier("Dệt may Thành Công")).await.unwrap();
        repo.insert(&supplier("Giày da Bình Tiên")).await.unwrap();

        let mut edit = supplier("Dệt may Thành Công (TCM)");
        edit.contact_name = Some("Chị Hoa".to_string());
        let updated = repo.update(&a.id, &edit).await.unwrap();
        assert_eq!(updated.name, "Dệt may Thành Công (TCM)");
        assert_eq!(updated.contact_name.as_deref(), Some("Chị Hoa"));

        repo.deactivate(&a.id).await.unwrap();
        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);
        assert!(!repo.get_by_id(&a.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn test_missing_supplier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.suppliers().deactivate("nope").await.unwrap_err();
        assert!(err.is_not_found());

        let err = db.suppliers().insert(&supplier("  ")).await.unwrap_err();
        assert!(!err.is_not_found());
    }
}
