use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::products::models::Product;

pub struct ProductRepository {
    pool: MySqlPool,
}

impl ProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, product: &Product) -> Result<Product> {
        sqlx::query(
            r#"
            INSERT INTO products (id, owner_id, name, description, sku, unit_price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.owner_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.unit_price)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(product.clone())
    }

    pub async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, owner_id, name, description, sku, unit_price, created_at, updated_at
            FROM products
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.map(ProductRow::into_product))
    }

    pub async fn list(&self, owner_id: &str, limit: i64, offset: i64) -> Result<Vec<Product>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, owner_id, name, description, sku, unit_price, created_at, updated_at
            FROM products
            WHERE owner_id = ?
            ORDER BY name
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    pub async fn update(&self, product: &Product) -> Result<Product> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, sku = ?, unit_price = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.unit_price)
        .bind(product.updated_at)
        .bind(&product.id)
        .bind(&product.owner_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Product with id '{}' not found",
                product.id
            )));
        }

        Ok(product.clone())
    }

    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Product with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    owner_id: String,
    name: String,
    description: Option<String>,
    sku: Option<String>,
    unit_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            sku: self.sku,
            unit_price: self.unit_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
