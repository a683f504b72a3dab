use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::deals::models::DealStage;
use crate::modules::reports::models::{
    DashboardSummary, SalesReport, SalesReportQuery, StageBreakdown,
};
use crate::modules::reports::repositories::ReportRepository;

pub struct ReportService {
    repository: Arc<ReportRepository>,
}

impl ReportService {
    pub fn new(repository: Arc<ReportRepository>) -> Self {
        Self { repository }
    }

    /// Workspace-wide counts plus the pipeline rollup. Every stage appears
    /// in the output even when it holds no deals.
    pub async fn dashboard_summary(&self, owner_id: &str) -> Result<DashboardSummary> {
        let lead_count = self.repository.count_leads(owner_id).await?;
        let customer_count = self.repository.count_customers(owner_id).await?;
        let grouped = self.repository.pipeline_by_stage(owner_id).await?;

        let pipeline: Vec<StageBreakdown> = DealStage::ALL
            .iter()
            .map(|stage| {
                grouped
                    .iter()
                    .find(|entry| entry.stage == *stage)
                    .cloned()
                    .unwrap_or(StageBreakdown {
                        stage: *stage,
                        deal_count: 0,
                        value_total: Decimal::ZERO,
                    })
            })
            .collect();

        let open_pipeline_value = pipeline
            .iter()
            .filter(|entry| entry.stage.is_open())
            .map(|entry| entry.value_total)
            .sum();

        Ok(DashboardSummary {
            lead_count,
            customer_count,
            pipeline,
            open_pipeline_value,
        })
    }

    pub async fn sales_report(
        &self,
        query: SalesReportQuery,
        owner_id: &str,
    ) -> Result<SalesReport> {
        if query.start_date > query.end_date {
            return Err(AppError::validation(
                "start_date must not be after end_date",
            ));
        }

        info!(
            owner_id = %owner_id,
            start_date = %query.start_date,
            end_date = %query.end_date,
            "Generating sales report"
        );

        let breakdown = self
            .repository
            .sales_by_kind(owner_id, query.start_date, query.end_date, query.kind)
            .await?;

        Ok(SalesReport {
            start_date: query.start_date,
            end_date: query.end_date,
            breakdown,
        })
    }
}
