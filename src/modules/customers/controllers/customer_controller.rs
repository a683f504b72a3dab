use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::customers::models::{Customer, CustomerPayload};
use crate::modules::customers::repositories::CustomerRepository;

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /customers
pub async fn create_customer(
    repo: web::Data<CustomerRepository>,
    owner_id: OwnerId,
    request: web::Json<CustomerPayload>,
) -> Result<HttpResponse, AppError> {
    let customer = Customer::new(owner_id.0, request.into_inner())?;
    let created = repo.create(&customer).await?;

    Ok(HttpResponse::Created().json(created))
}

/// GET /customers/{id}
pub async fn get_customer(
    repo: web::Data<CustomerRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let customer = repo
        .find_by_id(&path.into_inner(), &owner_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    Ok(HttpResponse::Ok().json(customer))
}

/// GET /customers
pub async fn list_customers(
    repo: web::Data<CustomerRepository>,
    owner_id: OwnerId,
    query: web::Query<ListCustomersQuery>,
) -> Result<HttpResponse, AppError> {
    let customers = repo.list(&owner_id.0, query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(customers))
}

/// PUT /customers/{id}
pub async fn update_customer(
    repo: web::Data<CustomerRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
    request: web::Json<CustomerPayload>,
) -> Result<HttpResponse, AppError> {
    let mut customer = repo
        .find_by_id(&path.into_inner(), &owner_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    customer.apply(request.into_inner())?;
    let updated = repo.update(&customer).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /customers/{id}
pub async fn delete_customer(
    repo: web::Data<CustomerRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    repo.delete(&path.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(create_customer))
            .route("", web::get().to(list_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}
