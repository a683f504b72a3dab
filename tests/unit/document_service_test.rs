// Document service behavior against an in-memory repository: totals are
// computed server-side from the request lines, updates recompute every
// derived field, and stored totals are snapshots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dealdesk::core::{AppError, Result};
use dealdesk::modules::documents::models::{
    CreateDocumentRequest, CreateLineItemRequest, DocumentKind, FinancialDocument, TaxSpec,
    UpdateDocumentRequest,
};
use dealdesk::modules::documents::repositories::DocumentRepository;
use dealdesk::modules::documents::services::DocumentService;

#[derive(Default)]
struct InMemoryDocumentRepository {
    documents: Mutex<HashMap<String, FinancialDocument>>,
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: &FinancialDocument) -> Result<FinancialDocument> {
        let mut documents = self.documents.lock().unwrap();
        if documents
            .values()
            .any(|d| d.owner_id == document.owner_id && d.document_no == document.document_no)
        {
            return Err(AppError::validation(format!(
                "Document number '{}' already exists",
                document.document_no
            )));
        }
        documents.insert(document.id.clone(), document.clone());
        Ok(document.clone())
    }

    async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<FinancialDocument>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .get(id)
            .filter(|d| d.owner_id == owner_id)
            .cloned())
    }

    async fn list(
        &self,
        owner_id: &str,
        kind: Option<DocumentKind>,
        _limit: i64,
        _offset: i64,
    ) -> Result<Vec<FinancialDocument>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.owner_id == owner_id)
            .filter(|d| kind.map_or(true, |k| d.kind == k))
            .cloned()
            .collect())
    }

    async fn update(&self, document: &FinancialDocument) -> Result<FinancialDocument> {
        self.documents
            .lock()
            .unwrap()
            .insert(document.id.clone(), document.clone());
        Ok(document.clone())
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        match documents.get(id) {
            Some(d) if d.owner_id == owner_id => {
                documents.remove(id);
                Ok(())
            }
            _ => Err(AppError::not_found("Document not found")),
        }
    }
}

fn service() -> (Arc<InMemoryDocumentRepository>, DocumentService) {
    let repo = Arc::new(InMemoryDocumentRepository::default());
    let svc = DocumentService::new(repo.clone());
    (repo, svc)
}

fn gst_request(document_no: &str, kind: DocumentKind) -> CreateDocumentRequest {
    CreateDocumentRequest {
        document_no: document_no.to_string(),
        kind,
        customer_id: None,
        tax: TaxSpec::Percentage {
            cgst_percent: dec!(9),
            sgst_percent: dec!(9),
        },
        discount_amount: dec!(100),
        line_items: vec![
            CreateLineItemRequest {
                description: "Service A".to_string(),
                quantity: dec!(2),
                unit_price: dec!(500),
            },
            CreateLineItemRequest {
                description: "Service B".to_string(),
                quantity: dec!(1),
                unit_price: dec!(300),
            },
        ],
    }
}

#[tokio::test]
async fn create_computes_totals_server_side() {
    let (_, svc) = service();

    let response = svc
        .create_document(gst_request("QT-0001", DocumentKind::Quotation), "owner-1")
        .await
        .unwrap();

    assert_eq!(response.subtotal, "1300");
    assert_eq!(response.cgst_amount, "117");
    assert_eq!(response.sgst_amount, "117");
    assert_eq!(response.tax_amount, "234");
    assert_eq!(response.total_amount, "1434");
    assert_eq!(response.line_items.len(), 2);
    assert_eq!(response.line_items[0].position, 0);
    assert_eq!(response.line_items[1].position, 1);
}

#[tokio::test]
async fn create_rejects_invalid_line_without_persisting() {
    let (repo, svc) = service();

    let mut request = gst_request("QT-0002", DocumentKind::Quotation);
    request.line_items[1].quantity = dec!(-1);

    let result = svc.create_document(request, "owner-1").await;

    assert!(result.is_err());
    assert!(repo.documents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_out_of_range_percent() {
    let (_, svc) = service();

    let mut request = gst_request("QT-0003", DocumentKind::Quotation);
    request.tax = TaxSpec::Percentage {
        cgst_percent: dec!(101),
        sgst_percent: dec!(9),
    };

    assert!(svc.create_document(request, "owner-1").await.is_err());
}

#[tokio::test]
async fn duplicate_document_no_is_rejected() {
    let (_, svc) = service();

    svc.create_document(gst_request("INV-0001", DocumentKind::Invoice), "owner-1")
        .await
        .unwrap();

    let result = svc
        .create_document(gst_request("INV-0001", DocumentKind::Invoice), "owner-1")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn update_recomputes_all_derived_fields() {
    let (_, svc) = service();

    let created = svc
        .create_document(gst_request("INV-0002", DocumentKind::Invoice), "owner-1")
        .await
        .unwrap();

    let updated = svc
        .update_document(
            &created.id,
            UpdateDocumentRequest {
                customer_id: None,
                tax: TaxSpec::Flat { amount: dec!(50) },
                discount_amount: Decimal::ZERO,
                line_items: vec![CreateLineItemRequest {
                    description: "Service A".to_string(),
                    quantity: dec!(1),
                    unit_price: dec!(1000),
                }],
            },
            "owner-1",
        )
        .await
        .unwrap();

    assert_eq!(updated.subtotal, "1000");
    assert_eq!(updated.cgst_amount, "0");
    assert_eq!(updated.sgst_amount, "0");
    assert_eq!(updated.tax_amount, "50");
    assert_eq!(updated.total_amount, "1050");
    assert_eq!(updated.line_items.len(), 1);
}

#[tokio::test]
async fn update_to_empty_line_list_is_legal() {
    let (_, svc) = service();

    let created = svc
        .create_document(gst_request("INV-0003", DocumentKind::Invoice), "owner-1")
        .await
        .unwrap();

    let updated = svc
        .update_document(
            &created.id,
            UpdateDocumentRequest {
                customer_id: None,
                tax: TaxSpec::Flat {
                    amount: Decimal::ZERO,
                },
                discount_amount: Decimal::ZERO,
                line_items: vec![],
            },
            "owner-1",
        )
        .await
        .unwrap();

    assert_eq!(updated.subtotal, "0");
    assert_eq!(updated.total_amount, "0");
}

#[tokio::test]
async fn stored_totals_are_snapshots() {
    let (repo, svc) = service();

    let first = svc
        .create_document(gst_request("QT-0004", DocumentKind::Quotation), "owner-1")
        .await
        .unwrap();

    // A later document with different lines never disturbs the first one
    let mut other = gst_request("QT-0005", DocumentKind::Quotation);
    other.line_items[0].unit_price = dec!(999.99);
    svc.create_document(other, "owner-1").await.unwrap();

    let stored = repo
        .find_by_id(&first.id, "owner-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.totals.total_amount, dec!(1434));
}

#[tokio::test]
async fn documents_are_scoped_to_owner() {
    let (_, svc) = service();

    let created = svc
        .create_document(gst_request("QT-0006", DocumentKind::Quotation), "owner-1")
        .await
        .unwrap();

    assert!(svc.get_document(&created.id, "owner-2").await.is_err());
    assert!(svc.get_document(&created.id, "owner-1").await.is_ok());
}

#[tokio::test]
async fn list_filters_by_kind() {
    let (_, svc) = service();

    svc.create_document(gst_request("QT-0007", DocumentKind::Quotation), "owner-1")
        .await
        .unwrap();
    svc.create_document(gst_request("INV-0008", DocumentKind::Invoice), "owner-1")
        .await
        .unwrap();

    let invoices = svc
        .list_documents("owner-1", Some(DocumentKind::Invoice), 50, 0)
        .await
        .unwrap();

    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].kind, DocumentKind::Invoice);
}
