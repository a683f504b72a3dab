// Financial document: the shared header model behind quotations, sales
// orders and invoices. Totals are derived fields, recomputed as a whole from
// the current lines, tax spec and discount; once saved they are a
// point-in-time snapshot that later price-book edits never touch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::line_item::LineItem;
use super::tax_spec::TaxSpec;
use crate::core::money::{round_minor, validate_minor_unit, validate_non_negative};
use crate::core::{AppError, Result};

/// Kind of financial document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quotation,
    SalesOrder,
    Invoice,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Quotation => write!(f, "quotation"),
            DocumentKind::SalesOrder => write!(f, "sales_order"),
            DocumentKind::Invoice => write!(f, "invoice"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "quotation" => Ok(DocumentKind::Quotation),
            "sales_order" => Ok(DocumentKind::SalesOrder),
            "invoice" => Ok(DocumentKind::Invoice),
            _ => Err(format!("Invalid document kind: {}", s)),
        }
    }
}

/// Derived totals. Every recomputation replaces the whole struct; there is no
/// partial update path, so the fields can never disagree with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Exact sum of line amounts
    pub subtotal: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub tax_amount: Decimal,
    /// subtotal + tax_amount - discount, at minor-unit precision.
    /// May be negative when the discount exceeds subtotal plus tax.
    pub total_amount: Decimal,
}

impl DocumentTotals {
    /// Compute totals from current inputs.
    ///
    /// An empty line list yields subtotal 0 and total `tax - discount`;
    /// removing the last line is permitted and produces exactly that state.
    pub fn compute(lines: &[LineItem], tax: &TaxSpec, discount_amount: Decimal) -> Self {
        let subtotal: Decimal = lines.iter().map(|line| line.amount).sum();
        let tax_amounts = tax.tax_on(subtotal);

        Self {
            subtotal,
            cgst_amount: tax_amounts.cgst_amount,
            sgst_amount: tax_amounts.sgst_amount,
            tax_amount: tax_amounts.tax_amount,
            total_amount: round_minor(subtotal + tax_amounts.tax_amount - discount_amount),
        }
    }
}

/// Document header plus its ordered lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialDocument {
    pub id: String,
    pub owner_id: String,
    pub document_no: String,
    pub kind: DocumentKind,
    pub customer_id: Option<String>,
    pub tax: TaxSpec,
    pub discount_amount: Decimal,
    pub totals: DocumentTotals,
    pub lines: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinancialDocument {
    /// Create a new document with validated inputs and freshly computed
    /// totals. Zero lines are legal; the last line may always be removed.
    pub fn new(
        owner_id: String,
        document_no: String,
        kind: DocumentKind,
        customer_id: Option<String>,
        tax: TaxSpec,
        discount_amount: Decimal,
        lines: Vec<LineItem>,
    ) -> Result<Self> {
        Self::validate_document_no(&document_no)?;
        tax.validate()?;
        Self::validate_discount(discount_amount)?;

        let now = Utc::now();
        let totals = DocumentTotals::compute(&lines, &tax, discount_amount);

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            document_no,
            kind,
            customer_id,
            tax,
            discount_amount,
            totals,
            lines,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace all derived totals from the current lines, tax and discount.
    /// Must be called after any mutation to those inputs; a stale total is a
    /// correctness bug.
    pub fn recalculate(&mut self) {
        self.totals = DocumentTotals::compute(&self.lines, &self.tax, self.discount_amount);
    }

    fn validate_document_no(document_no: &str) -> Result<()> {
        if document_no.trim().is_empty() {
            return Err(AppError::validation("Document number cannot be empty"));
        }
        if document_no.len() > 64 {
            return Err(AppError::validation(
                "Document number cannot exceed 64 characters",
            ));
        }
        Ok(())
    }

    fn validate_discount(discount_amount: Decimal) -> Result<()> {
        // A discount larger than the subtotal is allowed; the resulting
        // negative total is persisted as entered.
        validate_non_negative("discount", discount_amount)?;
        validate_minor_unit("discount", discount_amount)
    }
}

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLineItemRequest {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub document_no: String,
    pub kind: DocumentKind,
    pub customer_id: Option<String>,
    pub tax: TaxSpec,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub line_items: Vec<CreateLineItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub customer_id: Option<String>,
    pub tax: TaxSpec,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub line_items: Vec<CreateLineItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub id: Option<String>,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub document_no: String,
    pub kind: DocumentKind,
    pub customer_id: Option<String>,
    pub tax: TaxSpec,
    pub subtotal: String,
    pub cgst_amount: String,
    pub sgst_amount: String,
    pub tax_amount: String,
    pub discount_amount: String,
    pub total_amount: String,
    pub line_items: Vec<LineItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<FinancialDocument> for DocumentResponse {
    fn from(doc: FinancialDocument) -> Self {
        DocumentResponse {
            id: doc.id,
            document_no: doc.document_no,
            kind: doc.kind,
            customer_id: doc.customer_id,
            tax: doc.tax,
            subtotal: doc.totals.subtotal.to_string(),
            cgst_amount: doc.totals.cgst_amount.to_string(),
            sgst_amount: doc.totals.sgst_amount.to_string(),
            tax_amount: doc.totals.tax_amount.to_string(),
            discount_amount: doc.discount_amount.to_string(),
            total_amount: doc.totals.total_amount.to_string(),
            line_items: doc
                .lines
                .into_iter()
                .map(|line| LineItemResponse {
                    id: line.id,
                    description: line.description,
                    quantity: line.quantity.to_string(),
                    unit_price: line.unit_price.to_string(),
                    amount: line.amount.to_string(),
                    position: line.position,
                })
                .collect(),
            created_at: doc.created_at.to_rfc3339(),
            updated_at: doc.updated_at.to_rfc3339(),
        }
    }
}
