use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::documents::models::{
    CreateDocumentRequest, DocumentKind, UpdateDocumentRequest,
};
use crate::modules::documents::services::DocumentService;

/// Query parameters for listing documents
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub kind: Option<DocumentKind>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create a new document (quotation, sales order or invoice)
/// POST /documents
pub async fn create_document(
    service: web::Data<Arc<DocumentService>>,
    owner_id: OwnerId,
    request: web::Json<CreateDocumentRequest>,
) -> Result<HttpResponse, AppError> {
    let document = service
        .create_document(request.into_inner(), &owner_id.0)
        .await?;

    Ok(HttpResponse::Created().json(document))
}

/// Get document by ID (with lines)
/// GET /documents/{id}
pub async fn get_document(
    service: web::Data<Arc<DocumentService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let document = service.get_document(&path.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::Ok().json(document))
}

/// List documents, optionally filtered by kind
/// GET /documents?kind=quotation
pub async fn list_documents(
    service: web::Data<Arc<DocumentService>>,
    owner_id: OwnerId,
    query: web::Query<ListDocumentsQuery>,
) -> Result<HttpResponse, AppError> {
    let documents = service
        .list_documents(&owner_id.0, query.kind, query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(documents))
}

/// Replace lines, tax and discount; totals are recomputed server-side
/// PUT /documents/{id}
pub async fn update_document(
    service: web::Data<Arc<DocumentService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
    request: web::Json<UpdateDocumentRequest>,
) -> Result<HttpResponse, AppError> {
    let document = service
        .update_document(&path.into_inner(), request.into_inner(), &owner_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(document))
}

/// Delete a document and its lines
/// DELETE /documents/{id}
pub async fn delete_document(
    service: web::Data<Arc<DocumentService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .delete_document(&path.into_inner(), &owner_id.0)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/documents")
            .route("", web::post().to(create_document))
            .route("", web::get().to(list_documents))
            .route("/{id}", web::get().to(get_document))
            .route("/{id}", web::put().to(update_document))
            .route("/{id}", web::delete().to(delete_document)),
    );
}
