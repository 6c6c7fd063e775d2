//! # Catalog Repository
//!
//! Products and their properties (variants). Every property owns exactly one
//! inventory row, created together with it so imports can always resolve
//! `property_id → inventory_id`.
//!
//! ```text
//! create_product(NewProduct)
//!   BEGIN
//!     INSERT products            (1)
//!     INSERT properties          (n)
//!     INSERT inventory           (n, quantity = initial_quantity)
//!   COMMIT
//! ```

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{begin_write, generate_id};
use crate::error::DbResult;
use crate::revalidate::{Revalidator, INVENTORY_PATH};
use kho_core::validation::validate_new_product;
use kho_core::{NewProduct, Product, ProductDetail, Property};

const PRODUCT_COLUMNS: &str = "id, name, slug, description, is_active, created_at, updated_at";
const PROPERTY_COLUMNS: &str = "id, product_id, name, sku, price, created_at, updated_at";

/// Repository for products and properties.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
    revalidator: Arc<dyn Revalidator>,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool, revalidator: Arc<dyn Revalidator>) -> Self {
        CatalogRepository { pool, revalidator }
    }

    /// Creates a product, its properties and one inventory row per property.
    ///
    /// ## Errors
    /// - Validation errors for names, slug, SKUs, prices
    /// - `UniqueViolation` for a taken slug or SKU (nothing is written)
    pub async fn create_product(&self, input: &NewProduct) -> DbResult<ProductDetail> {
        validate_new_product(input)?;

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name: input.name.trim().to_string(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let mut tx = begin_write(&self.pool).await?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, description, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut properties = Vec::with_capacity(input.properties.len());

        for new_property in &input.properties {
            let property = Property {
                id: generate_id(),
                product_id: product.id.clone(),
                name: new_property.name.trim().to_string(),
                sku: new_property.sku.trim().to_string(),
                price: new_property.price,
                created_at: now,
                updated_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO properties (id, product_id, name, sku, price, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&property.id)
            .bind(&property.product_id)
            .bind(&property.name)
            .bind(&property.sku)
            .bind(property.price)
            .bind(property.created_at)
            .bind(property.updated_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO inventory (id, property_id, quantity, updated_at) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(generate_id())
            .bind(&property.id)
            .bind(new_property.initial_quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            debug!(sku = %property.sku, quantity = new_property.initial_quantity, "Property stocked");
            properties.push(property);
        }

        tx.commit().await?;

        info!(
            product_id = %product.id,
            properties = properties.len(),
            "Product created"
        );
        self.revalidator.revalidate(INVENTORY_PATH);

        Ok(ProductDetail {
            product,
            properties,
        })
    }

    /// Product with its properties, or `None`.
    pub async fn get_product(&self, id: &str) -> DbResult<Option<ProductDetail>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        let properties = self.list_properties(&product.id).await?;

        Ok(Some(ProductDetail {
            product,
            properties,
        }))
    }

    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn get_property(&self, id: &str) -> DbResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    pub async fn get_property_by_sku(&self, sku: &str) -> DbResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE sku = ?1"
        ))
        .bind(sku.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    /// Properties of one product, by SKU.
    pub async fn list_properties(&self, product_id: &str) -> DbResult<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE product_id = ?1 ORDER BY sku"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }
}
