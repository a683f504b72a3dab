use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::deals::models::DealStage;
use crate::modules::documents::models::DocumentKind;
use crate::modules::reports::models::{KindBreakdown, StageBreakdown};

pub struct ReportRepository {
    pool: MySqlPool,
}

impl ReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn count_leads(&self, owner_id: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM leads WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(count)
    }

    pub async fn count_customers(&self, owner_id: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM customers WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        Ok(count)
    }

    /// Deal counts and value totals grouped by stage. Stages with no deals
    /// are omitted here; the service fills the gaps.
    pub async fn pipeline_by_stage(&self, owner_id: &str) -> Result<Vec<StageBreakdown>> {
        let rows = sqlx::query_as::<_, PipelineRow>(
            r#"
            SELECT stage, COUNT(*) AS deal_count, COALESCE(SUM(value), 0) AS value_total
            FROM deals
            WHERE owner_id = ?
            GROUP BY stage
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        rows.into_iter().map(PipelineRow::into_breakdown).collect()
    }

    /// Document counts and money totals grouped by kind over a date window,
    /// both bounds inclusive.
    pub async fn sales_by_kind(
        &self,
        owner_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        kind: Option<DocumentKind>,
    ) -> Result<Vec<KindBreakdown>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query_as::<_, SalesRow>(
                    r#"
                    SELECT kind,
                           COUNT(*) AS document_count,
                           COALESCE(SUM(subtotal), 0) AS subtotal,
                           COALESCE(SUM(tax_amount), 0) AS tax_amount,
                           COALESCE(SUM(total_amount), 0) AS total_amount
                    FROM documents
                    WHERE owner_id = ?
                      AND kind = ?
                      AND DATE(created_at) BETWEEN ? AND ?
                    GROUP BY kind
                    "#,
                )
                .bind(owner_id)
                .bind(kind.to_string())
                .bind(start_date)
                .bind(end_date)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, SalesRow>(
                    r#"
                    SELECT kind,
                           COUNT(*) AS document_count,
                           COALESCE(SUM(subtotal), 0) AS subtotal,
                           COALESCE(SUM(tax_amount), 0) AS tax_amount,
                           COALESCE(SUM(total_amount), 0) AS total_amount
                    FROM documents
                    WHERE owner_id = ?
                      AND DATE(created_at) BETWEEN ? AND ?
                    GROUP BY kind
                    ORDER BY kind
                    "#,
                )
                .bind(owner_id)
                .bind(start_date)
                .bind(end_date)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(AppError::Database)?;

        rows.into_iter().map(SalesRow::into_breakdown).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PipelineRow {
    stage: String,
    deal_count: i64,
    value_total: Decimal,
}

impl PipelineRow {
    fn into_breakdown(self) -> Result<StageBreakdown> {
        let stage = DealStage::from_str(&self.stage)
            .map_err(|_| AppError::internal(format!("Unknown deal stage '{}' in storage", self.stage)))?;

        Ok(StageBreakdown {
            stage,
            deal_count: self.deal_count,
            value_total: self.value_total,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SalesRow {
    kind: String,
    document_count: i64,
    subtotal: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
}

impl SalesRow {
    fn into_breakdown(self) -> Result<KindBreakdown> {
        let kind = DocumentKind::from_str(&self.kind)
            .map_err(|_| AppError::internal(format!("Unknown document kind '{}' in storage", self.kind)))?;

        Ok(KindBreakdown {
            kind,
            document_count: self.document_count,
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            total_amount: self.total_amount,
        })
    }
}
