use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::customers::models::Customer;

pub struct CustomerRepository {
    pool: MySqlPool,
}

impl CustomerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, customer: &Customer) -> Result<Customer> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, owner_id, name, email, phone, address, gstin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.owner_id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.gstin)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(customer.clone())
    }

    pub async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, owner_id, name, email, phone, address, gstin, created_at, updated_at
            FROM customers
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row.map(CustomerRow::into_customer))
    }

    pub async fn list(&self, owner_id: &str, limit: i64, offset: i64) -> Result<Vec<Customer>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, owner_id, name, email, phone, address, gstin, created_at, updated_at
            FROM customers
            WHERE owner_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows.into_iter().map(CustomerRow::into_customer).collect())
    }

    pub async fn update(&self, customer: &Customer) -> Result<Customer> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, email = ?, phone = ?, address = ?, gstin = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.gstin)
        .bind(customer.updated_at)
        .bind(&customer.id)
        .bind(&customer.owner_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Customer with id '{}' not found",
                customer.id
            )));
        }

        Ok(customer.clone())
    }

    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Customer with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    owner_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    gstin: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self) -> Customer {
        Customer {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            gstin: self.gstin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
