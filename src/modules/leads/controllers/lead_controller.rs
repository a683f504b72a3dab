use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::leads::models::{Lead, LeadPayload};
use crate::modules::leads::repositories::LeadRepository;

#[derive(Debug, Deserialize)]
pub struct ListLeadsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /leads
pub async fn create_lead(
    repo: web::Data<LeadRepository>,
    owner_id: OwnerId,
    request: web::Json<LeadPayload>,
) -> Result<HttpResponse, AppError> {
    let lead = Lead::new(owner_id.0, request.into_inner())?;
    let created = repo.create(&lead).await?;

    Ok(HttpResponse::Created().json(created))
}

/// GET /leads/{id}
pub async fn get_lead(
    repo: web::Data<LeadRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let lead = repo
        .find_by_id(&path.into_inner(), &owner_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found"))?;

    Ok(HttpResponse::Ok().json(lead))
}

/// GET /leads
pub async fn list_leads(
    repo: web::Data<LeadRepository>,
    owner_id: OwnerId,
    query: web::Query<ListLeadsQuery>,
) -> Result<HttpResponse, AppError> {
    let leads = repo.list(&owner_id.0, query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(leads))
}

/// PUT /leads/{id}
pub async fn update_lead(
    repo: web::Data<LeadRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
    request: web::Json<LeadPayload>,
) -> Result<HttpResponse, AppError> {
    let mut lead = repo
        .find_by_id(&path.into_inner(), &owner_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Lead not found"))?;

    lead.apply(request.into_inner())?;
    let updated = repo.update(&lead).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /leads/{id}
pub async fn delete_lead(
    repo: web::Data<LeadRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    repo.delete(&path.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure lead routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leads")
            .route("", web::post().to(create_lead))
            .route("", web::get().to(list_leads))
            .route("/{id}", web::get().to(get_lead))
            .route("/{id}", web::put().to(update_lead))
            .route("/{id}", web::delete().to(delete_lead)),
    );
}
