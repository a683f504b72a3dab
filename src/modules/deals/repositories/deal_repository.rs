use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::MySqlPool;
use std::str::FromStr;

use crate::core::{AppError, Result};
use crate::modules::deals::models::{Deal, DealStage};

#[async_trait]
pub trait DealRepository: Send + Sync {
    async fn create(&self, deal: &Deal) -> Result<Deal>;

    async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Deal>>;

    async fn list(&self, owner_id: &str, limit: i64, offset: i64) -> Result<Vec<Deal>>;

    /// Update the mutable header fields (title, customer, value).
    async fn update(&self, deal: &Deal) -> Result<Deal>;

    /// Persist a stage change. Callers decide whether a write is warranted;
    /// a same-stage transition must never reach this method.
    async fn update_stage(&self, id: &str, owner_id: &str, stage: DealStage) -> Result<()>;

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()>;
}

pub struct MySqlDealRepository {
    pool: MySqlPool,
}

impl MySqlDealRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealRepository for MySqlDealRepository {
    async fn create(&self, deal: &Deal) -> Result<Deal> {
        sqlx::query(
            r#"
            INSERT INTO deals (id, owner_id, title, customer_id, value, stage, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&deal.id)
        .bind(&deal.owner_id)
        .bind(&deal.title)
        .bind(&deal.customer_id)
        .bind(deal.value)
        .bind(deal.stage.to_string())
        .bind(deal.created_at)
        .bind(deal.updated_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(deal.clone())
    }

    async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Deal>> {
        let row = sqlx::query_as::<_, DealRow>(
            r#"
            SELECT id, owner_id, title, customer_id, value, stage, created_at, updated_at
            FROM deals
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        row.map(DealRow::into_deal).transpose()
    }

    async fn list(&self, owner_id: &str, limit: i64, offset: i64) -> Result<Vec<Deal>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = sqlx::query_as::<_, DealRow>(
            r#"
            SELECT id, owner_id, title, customer_id, value, stage, created_at, updated_at
            FROM deals
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

        rows.into_iter().map(DealRow::into_deal).collect()
    }

    async fn update(&self, deal: &Deal) -> Result<Deal> {
        let result = sqlx::query(
            r#"
            UPDATE deals
            SET title = ?, customer_id = ?, value = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&deal.title)
        .bind(&deal.customer_id)
        .bind(deal.value)
        .bind(deal.updated_at)
        .bind(&deal.id)
        .bind(&deal.owner_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Deal with id '{}' not found",
                deal.id
            )));
        }

        Ok(deal.clone())
    }

    async fn update_stage(&self, id: &str, owner_id: &str, stage: DealStage) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE deals
            SET stage = ?, updated_at = NOW()
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(stage.to_string())
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Deal with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM deals WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Deal with id '{}' not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DealRow {
    id: String,
    owner_id: String,
    title: String,
    customer_id: Option<String>,
    value: Decimal,
    stage: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DealRow {
    fn into_deal(self) -> Result<Deal> {
        let stage = DealStage::from_str(&self.stage)
            .map_err(|e| AppError::internal(format!("Invalid stage in database: {}", e)))?;

        Ok(Deal {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            customer_id: self.customer_id,
            value: self.value,
            stage,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
