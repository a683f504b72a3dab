use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::documents::models::{
    CreateDocumentRequest, CreateLineItemRequest, DocumentKind, DocumentResponse,
    FinancialDocument, LineItem, UpdateDocumentRequest,
};
use crate::modules::documents::repositories::DocumentRepository;

/// Business logic for financial documents. All totals are computed here,
/// server-side, before anything is persisted; clients never supply derived
/// fields.
pub struct DocumentService {
    document_repo: Arc<dyn DocumentRepository>,
}

impl DocumentService {
    pub fn new(document_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repo }
    }

    /// Create a document with its lines. Validation failures (bad quantity,
    /// negative price, out-of-range percents) surface as typed errors rather
    /// than being coerced to zero.
    pub async fn create_document(
        &self,
        request: CreateDocumentRequest,
        owner_id: &str,
    ) -> Result<DocumentResponse> {
        let lines = build_lines(&request.line_items)?;

        let document = FinancialDocument::new(
            owner_id.to_string(),
            request.document_no,
            request.kind,
            request.customer_id,
            request.tax,
            request.discount_amount,
            lines,
        )?;

        let created = self.document_repo.create(&document).await?;

        info!(
            document_id = %created.id,
            kind = %created.kind,
            total = %created.totals.total_amount,
            "Document created"
        );

        Ok(created.into())
    }

    pub async fn get_document(&self, id: &str, owner_id: &str) -> Result<DocumentResponse> {
        let document = self
            .document_repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        Ok(document.into())
    }

    pub async fn list_documents(
        &self,
        owner_id: &str,
        kind: Option<DocumentKind>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DocumentResponse>> {
        let documents = self
            .document_repo
            .list(owner_id, kind, limit, offset)
            .await?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    /// Replace lines, tax and discount, then recompute every derived field
    /// from the new inputs. The stored totals of other documents are never
    /// touched; each persisted total is a point-in-time snapshot.
    pub async fn update_document(
        &self,
        id: &str,
        request: UpdateDocumentRequest,
        owner_id: &str,
    ) -> Result<DocumentResponse> {
        let mut document = self
            .document_repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Document not found"))?;

        request.tax.validate()?;
        crate::core::money::validate_non_negative("discount", request.discount_amount)?;
        crate::core::money::validate_minor_unit("discount", request.discount_amount)?;

        document.customer_id = request.customer_id;
        document.tax = request.tax;
        document.discount_amount = request.discount_amount;
        document.lines = build_lines(&request.line_items)?;
        document.updated_at = Utc::now();
        document.recalculate();

        let updated = self.document_repo.update(&document).await?;

        info!(
            document_id = %updated.id,
            total = %updated.totals.total_amount,
            "Document updated"
        );

        Ok(updated.into())
    }

    pub async fn delete_document(&self, id: &str, owner_id: &str) -> Result<()> {
        self.document_repo.delete(id, owner_id).await?;
        info!(document_id = %id, "Document deleted");
        Ok(())
    }
}

/// Validate request lines and derive their amounts. Position follows request
/// order; it is presentation order only and never affects totals.
fn build_lines(items: &[CreateLineItemRequest]) -> Result<Vec<LineItem>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            LineItem::new(
                item.description.clone(),
                item.quantity,
                item.unit_price,
                idx as i32,
            )
        })
        .collect()
}
