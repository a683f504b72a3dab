use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::leads::models::{Lead, LeadStatus};

pub struct LeadRepository {
    pool: MySqlPool,
}

impl LeadRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, lead: &Lead) -> Result<Lead> {
        sqlx::query(
            r#"
            INSERT INTO leads (id, owner_id, name, company, email, phone, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lead.id)
        .bind(&lead.owner_id)
        .bind(&lead.name)
        .bind(&lead.company)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.status.to_string())
        .bind(&lead.notes)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(lead.clone())
    }

    pub async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Lead>> {
        let row = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, owner_id, name, company, email, phone, status, notes, created_at, updated_at
            FROM leads
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        row.map(LeadRow::into_lead).transpose()
    }

    pub async fn list(&self, owner_id: &str, limit: i64, offset: i64) -> Result<Vec<Lead>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = sqlx::query_as::<_, LeadRow>(
            r#"
            SELECT id, owner_id, name, company, email, phone, status, notes, created_at, updated_at
            FROM leads
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

        rows.into_iter().map(LeadRow::into_lead).collect()
    }

    pub async fn update(&self, lead: &Lead) -> Result<Lead> {
        let result = sqlx::query(
            r#"
            UPDATE leads
            SET name = ?, company = ?, email = ?, phone = ?, status = ?, notes = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.company)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.status.to_string())
        .bind(&lead.notes)
        .bind(lead.updated_at)
        .bind(&lead.id)
        .bind(&lead.owner_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Lead with id '{}' not found", lead.id)));
        }

        Ok(lead.clone())
    }

    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Lead with id '{}' not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: String,
    owner_id: String,
    name: String,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead> {
        let status = LeadStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid lead status in database: {}", e)))?;

        Ok(Lead {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            company: self.company,
            email: self.email,
            phone: self.phone,
            status,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
