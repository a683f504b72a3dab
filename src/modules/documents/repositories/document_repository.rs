// MySQL persistence for financial documents. A document and its lines are
// written in one transaction: a header can never be persisted without its
// lines (or vice versa), so no compensation path is needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::documents::models::{
    DocumentKind, DocumentTotals, FinancialDocument, LineItem, TaxSpec,
};

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a document header and all of its lines transactionally.
    /// Returns the stored document with generated line IDs.
    async fn create(&self, document: &FinancialDocument) -> Result<FinancialDocument>;

    /// Fetch a document with its lines, ordered by position.
    async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<FinancialDocument>>;

    /// List documents newest first, optionally filtered by kind.
    /// Lines are omitted for list views.
    async fn list(
        &self,
        owner_id: &str,
        kind: Option<DocumentKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FinancialDocument>>;

    /// Replace the header fields and rewrite the full line set
    /// transactionally.
    async fn update(&self, document: &FinancialDocument) -> Result<FinancialDocument>;

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()>;
}

pub struct MySqlDocumentRepository {
    pool: MySqlPool,
}

impl MySqlDocumentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert_lines(
        tx: &mut Transaction<'_, MySql>,
        document_id: &str,
        lines: &[LineItem],
    ) -> Result<Vec<LineItem>> {
        let mut stored = Vec::with_capacity(lines.len());

        for line in lines {
            let line_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO document_lines (
                    id, document_id, description, quantity, unit_price, amount, position
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&line_id)
            .bind(document_id)
            .bind(&line.description)
            .bind(line.quantity)
            .bind(line.unit_price)
            .bind(line.amount)
            .bind(line.position)
            .execute(&mut **tx)
            .await
            .map_err(AppError::Database)?;

            let mut line = line.clone();
            line.id = Some(line_id);
            line.document_id = Some(document_id.to_string());
            stored.push(line);
        }

        Ok(stored)
    }

    async fn fetch_lines(&self, document_id: &str) -> Result<Vec<LineItem>> {
        let rows = sqlx::query_as::<_, LineRow>(
            r#"
            SELECT id, document_id, description, quantity, unit_price, amount, position
            FROM document_lines
            WHERE document_id = ?
            ORDER BY position
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows.into_iter().map(LineRow::into_line_item).collect())
    }
}

#[async_trait]
impl DocumentRepository for MySqlDocumentRepository {
    async fn create(&self, document: &FinancialDocument) -> Result<FinancialDocument> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let (cgst_percent, sgst_percent) = percentage_columns(&document.tax);

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, owner_id, document_no, kind, customer_id,
                tax_type, cgst_percent, sgst_percent, flat_tax_amount,
                discount_amount, subtotal, cgst_amount, sgst_amount,
                tax_amount, total_amount, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&document.id)
        .bind(&document.owner_id)
        .bind(&document.document_no)
        .bind(document.kind.to_string())
        .bind(&document.customer_id)
        .bind(document.tax.type_name())
        .bind(cgst_percent)
        .bind(sgst_percent)
        .bind(flat_column(&document.tax))
        .bind(document.discount_amount)
        .bind(document.totals.subtotal)
        .bind(document.totals.cgst_amount)
        .bind(document.totals.sgst_amount)
        .bind(document.totals.tax_amount)
        .bind(document.totals.total_amount)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::validation(format!(
                        "Document with number '{}' already exists",
                        document.document_no
                    ));
                }
            }
            AppError::Database(e)
        })?;

        let lines = Self::insert_lines(&mut tx, &document.id, &document.lines).await?;

        tx.commit().await.map_err(AppError::Database)?;

        let mut created = document.clone();
        created.lines = lines;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<FinancialDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, owner_id, document_no, kind, customer_id,
                   tax_type, cgst_percent, sgst_percent, flat_tax_amount,
                   discount_amount, subtotal, cgst_amount, sgst_amount,
                   tax_amount, total_amount, created_at, updated_at
            FROM documents
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = self.fetch_lines(id).await?;
        Ok(Some(row.into_document(lines)?))
    }

    async fn list(
        &self,
        owner_id: &str,
        kind: Option<DocumentKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FinancialDocument>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);

        let rows = match kind {
            Some(kind) => {
                sqlx::query_as::<_, DocumentRow>(
                    r#"
                    SELECT id, owner_id, document_no, kind, customer_id,
                           tax_type, cgst_percent, sgst_percent, flat_tax_amount,
                           discount_amount, subtotal, cgst_amount, sgst_amount,
                           tax_amount, total_amount, created_at, updated_at
                    FROM documents
                    WHERE owner_id = ? AND kind = ?
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(owner_id)
                .bind(kind.to_string())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, DocumentRow>(
                    r#"
                    SELECT id, owner_id, document_no, kind, customer_id,
                           tax_type, cgst_percent, sgst_percent, flat_tax_amount,
                           discount_amount, subtotal, cgst_amount, sgst_amount,
                           tax_amount, total_amount, created_at, updated_at
                    FROM documents
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
            }
        }
        .map_err(AppError::Database)?;

        rows.into_iter().map(|row| row.into_document(vec![])).collect()
    }

    async fn update(&self, document: &FinancialDocument) -> Result<FinancialDocument> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let (cgst_percent, sgst_percent) = percentage_columns(&document.tax);

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET customer_id = ?, tax_type = ?, cgst_percent = ?, sgst_percent = ?,
                flat_tax_amount = ?, discount_amount = ?, subtotal = ?,
                cgst_amount = ?, sgst_amount = ?, tax_amount = ?, total_amount = ?,
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(&document.customer_id)
        .bind(document.tax.type_name())
        .bind(cgst_percent)
        .bind(sgst_percent)
        .bind(flat_column(&document.tax))
        .bind(document.discount_amount)
        .bind(document.totals.subtotal)
        .bind(document.totals.cgst_amount)
        .bind(document.totals.sgst_amount)
        .bind(document.totals.tax_amount)
        .bind(document.totals.total_amount)
        .bind(document.updated_at)
        .bind(&document.id)
        .bind(&document.owner_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Document with id '{}' not found",
                document.id
            )));
        }

        sqlx::query("DELETE FROM document_lines WHERE document_id = ?")
            .bind(&document.id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let lines = Self::insert_lines(&mut tx, &document.id, &document.lines).await?;

        tx.commit().await.map_err(AppError::Database)?;

        let mut updated = document.clone();
        updated.lines = lines;
        Ok(updated)
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        // Lines go with the header via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM documents WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Document with id '{}' not found",
                id
            )));
        }

        Ok(())
    }
}

fn percentage_columns(tax: &TaxSpec) -> (Option<Decimal>, Option<Decimal>) {
    match tax {
        TaxSpec::Percentage {
            cgst_percent,
            sgst_percent,
        } => (Some(*cgst_percent), Some(*sgst_percent)),
        TaxSpec::Flat { .. } => (None, None),
    }
}

fn flat_column(tax: &TaxSpec) -> Option<Decimal> {
    match tax {
        TaxSpec::Flat { amount } => Some(*amount),
        TaxSpec::Percentage { .. } => None,
    }
}

// Helper structs for database mapping

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    owner_id: String,
    document_no: String,
    kind: String,
    customer_id: Option<String>,
    tax_type: String,
    cgst_percent: Option<Decimal>,
    sgst_percent: Option<Decimal>,
    flat_tax_amount: Option<Decimal>,
    discount_amount: Decimal,
    subtotal: Decimal,
    cgst_amount: Decimal,
    sgst_amount: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn into_document(self, lines: Vec<LineItem>) -> Result<FinancialDocument> {
        let kind = DocumentKind::from_str(&self.kind)
            .map_err(|e| AppError::internal(format!("Invalid kind in database: {}", e)))?;

        let tax = TaxSpec::from_columns(
            &self.tax_type,
            self.cgst_percent,
            self.sgst_percent,
            self.flat_tax_amount,
        )?;

        Ok(FinancialDocument {
            id: self.id,
            owner_id: self.owner_id,
            document_no: self.document_no,
            kind,
            customer_id: self.customer_id,
            tax,
            discount_amount: self.discount_amount,
            totals: DocumentTotals {
                subtotal: self.subtotal,
                cgst_amount: self.cgst_amount,
                sgst_amount: self.sgst_amount,
                tax_amount: self.tax_amount,
                total_amount: self.total_amount,
            },
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: String,
    document_id: String,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    amount: Decimal,
    position: i32,
}

impl LineRow {
    fn into_line_item(self) -> LineItem {
        LineItem {
            id: Some(self.id),
            document_id: Some(self.document_id),
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            amount: self.amount,
            position: self.position,
        }
    }
}
