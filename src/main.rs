use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dealdesk::config::Config;
use dealdesk::middleware::{ApiKeyAuth, RateLimiter, RequestId};
use dealdesk::modules::customers::repositories::CustomerRepository;
use dealdesk::modules::customers::controllers as customer_controllers;
use dealdesk::modules::deals::controllers as deal_controllers;
use dealdesk::modules::deals::repositories::{DealRepository, MySqlDealRepository};
use dealdesk::modules::deals::services::DealService;
use dealdesk::modules::documents::controllers as document_controllers;
use dealdesk::modules::documents::repositories::{DocumentRepository, MySqlDocumentRepository};
use dealdesk::modules::documents::services::DocumentService;
use dealdesk::modules::leads::controllers as lead_controllers;
use dealdesk::modules::leads::repositories::LeadRepository;
use dealdesk::modules::products::controllers as product_controllers;
use dealdesk::modules::products::repositories::ProductRepository;
use dealdesk::modules::reports::controllers as report_controllers;
use dealdesk::modules::reports::repositories::ReportRepository;
use dealdesk::modules::reports::services::ReportService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dealdesk=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting DealDesk");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations applied");

    // Wire repositories and services
    let document_repository: Arc<dyn DocumentRepository> =
        Arc::new(MySqlDocumentRepository::new(db_pool.clone()));
    let document_service = Arc::new(DocumentService::new(document_repository));

    let deal_repository: Arc<dyn DealRepository> =
        Arc::new(MySqlDealRepository::new(db_pool.clone()));
    let deal_service = Arc::new(DealService::new(deal_repository));

    let lead_repository = web::Data::new(LeadRepository::new(db_pool.clone()));
    let customer_repository = web::Data::new(CustomerRepository::new(db_pool.clone()));
    let product_repository = web::Data::new(ProductRepository::new(db_pool.clone()));

    let report_repository = Arc::new(ReportRepository::new(db_pool.clone()));
    let report_service = Arc::new(ReportService::new(report_repository));

    let rate_limit = config.security.rate_limit_per_minute;

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        // Wraps run in reverse registration order: CORS outermost so
        // preflight requests are answered before auth sees them.
        App::new()
            .wrap(ApiKeyAuth::new(db_pool.clone()))
            .wrap(RateLimiter::new(rate_limit))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(document_service.clone()))
            .app_data(web::Data::new(deal_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(lead_repository.clone())
            .app_data(customer_repository.clone())
            .app_data(product_repository.clone())
            .configure(document_controllers::configure)
            .configure(deal_controllers::configure)
            .configure(lead_controllers::configure)
            .configure(customer_controllers::configure)
            .configure(product_controllers::configure)
            .configure(report_controllers::configure)
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;

    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "dealdesk"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "DealDesk",
        "version": "0.1.0",
        "status": "running"
    }))
}
