use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::deals::models::{CreateDealRequest, MoveStageRequest, UpdateDealRequest};
use crate::modules::deals::services::DealService;

#[derive(Debug, Deserialize)]
pub struct ListDealsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Create a deal
/// POST /deals
pub async fn create_deal(
    service: web::Data<Arc<DealService>>,
    owner_id: OwnerId,
    request: web::Json<CreateDealRequest>,
) -> Result<HttpResponse, AppError> {
    let deal = service.create_deal(request.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::Created().json(deal))
}

/// Get deal by ID
/// GET /deals/{id}
pub async fn get_deal(
    service: web::Data<Arc<DealService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let deal = service.get_deal(&path.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::Ok().json(deal))
}

/// List deals
/// GET /deals
pub async fn list_deals(
    service: web::Data<Arc<DealService>>,
    owner_id: OwnerId,
    query: web::Query<ListDealsQuery>,
) -> Result<HttpResponse, AppError> {
    let deals = service
        .list_deals(&owner_id.0, query.limit, query.offset)
        .await?;

    Ok(HttpResponse::Ok().json(deals))
}

/// Update deal header fields
/// PUT /deals/{id}
pub async fn update_deal(
    service: web::Data<Arc<DealService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
    request: web::Json<UpdateDealRequest>,
) -> Result<HttpResponse, AppError> {
    let deal = service
        .update_deal(&path.into_inner(), request.into_inner(), &owner_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(deal))
}

/// Move a deal to another pipeline stage
/// PATCH /deals/{id}/stage
pub async fn move_stage(
    service: web::Data<Arc<DealService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
    request: web::Json<MoveStageRequest>,
) -> Result<HttpResponse, AppError> {
    let deal = service
        .move_stage(&path.into_inner(), &request.stage, &owner_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(deal))
}

/// Delete a deal
/// DELETE /deals/{id}
pub async fn delete_deal(
    service: web::Data<Arc<DealService>>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_deal(&path.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure deal routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/deals")
            .route("", web::post().to(create_deal))
            .route("", web::get().to(list_deals))
            .route("/{id}", web::get().to(get_deal))
            .route("/{id}", web::put().to(update_deal))
            .route("/{id}/stage", web::patch().to(move_stage))
            .route("/{id}", web::delete().to(delete_deal)),
    );
}
