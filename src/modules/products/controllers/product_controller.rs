use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::products::models::{Product, ProductPayload};
use crate::modules::products::repositories::ProductRepository;

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /products
pub async fn create_product(
    repo: web::Data<ProductRepository>,
    owner_id: OwnerId,
    request: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
    let product = Product::new(owner_id.0, request.into_inner())?;
    let created = repo.create(&product).await?;

    Ok(HttpResponse::Created().json(created))
}

/// GET /products/{id}
pub async fn get_product(
    repo: web::Data<ProductRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let product = repo
        .find_by_id(&path.into_inner(), &owner_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(HttpResponse::Ok().json(product))
}

/// GET /products
pub async fn list_products(
    repo: web::Data<ProductRepository>,
    owner_id: OwnerId,
    query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
    let products = repo.list(&owner_id.0, query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(products))
}

/// PUT /products/{id}
pub async fn update_product(
    repo: web::Data<ProductRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
    request: web::Json<ProductPayload>,
) -> Result<HttpResponse, AppError> {
    let mut product = repo
        .find_by_id(&path.into_inner(), &owner_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    product.apply(request.into_inner())?;
    let updated = repo.update(&product).await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /products/{id}
pub async fn delete_product(
    repo: web::Data<ProductRepository>,
    owner_id: OwnerId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    repo.delete(&path.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create_product))
            .route("", web::get().to(list_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
