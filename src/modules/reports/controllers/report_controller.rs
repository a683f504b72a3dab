use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::OwnerId;
use crate::modules::reports::models::{DashboardSummaryResponse, SalesReportQuery, SalesReportResponse};
use crate::modules::reports::services::ReportService;

/// GET /reports/dashboard
pub async fn dashboard(
    service: web::Data<Arc<ReportService>>,
    owner_id: OwnerId,
) -> Result<HttpResponse, AppError> {
    let summary = service.dashboard_summary(&owner_id.0).await?;

    Ok(HttpResponse::Ok().json(DashboardSummaryResponse::from(summary)))
}

/// GET /reports/sales?start_date=...&end_date=...[&kind=...]
pub async fn sales(
    service: web::Data<Arc<ReportService>>,
    owner_id: OwnerId,
    query: web::Query<SalesReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report = service.sales_report(query.into_inner(), &owner_id.0).await?;

    Ok(HttpResponse::Ok().json(SalesReportResponse::from(report)))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(dashboard))
            .route("/sales", web::get().to(sales)),
    );
}
