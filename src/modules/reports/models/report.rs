use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::deals::models::DealStage;
use crate::modules::documents::models::DocumentKind;

/// Pipeline rollup for a single deal stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageBreakdown {
    pub stage: DealStage,
    pub deal_count: i64,
    pub value_total: Decimal,
}

/// Counts and pipeline totals across the owner's workspace.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub lead_count: i64,
    pub customer_count: i64,
    pub pipeline: Vec<StageBreakdown>,
    pub open_pipeline_value: Decimal,
}

/// Per-document-kind totals over a reporting window.
#[derive(Debug, Clone, PartialEq)]
pub struct KindBreakdown {
    pub kind: DocumentKind,
    pub document_count: i64,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct SalesReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub breakdown: Vec<KindBreakdown>,
}

#[derive(Debug, Deserialize)]
pub struct SalesReportQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: Option<DocumentKind>,
}

#[derive(Debug, Serialize)]
pub struct StageBreakdownResponse {
    pub stage: String,
    pub deal_count: i64,
    pub value_total: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummaryResponse {
    pub lead_count: i64,
    pub customer_count: i64,
    pub pipeline: Vec<StageBreakdownResponse>,
    pub open_pipeline_value: String,
}

impl From<DashboardSummary> for DashboardSummaryResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            lead_count: summary.lead_count,
            customer_count: summary.customer_count,
            pipeline: summary
                .pipeline
                .into_iter()
                .map(|entry| StageBreakdownResponse {
                    stage: entry.stage.to_string(),
                    deal_count: entry.deal_count,
                    value_total: entry.value_total.to_string(),
                })
                .collect(),
            open_pipeline_value: summary.open_pipeline_value.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KindBreakdownResponse {
    pub kind: String,
    pub document_count: i64,
    pub subtotal: String,
    pub tax_amount: String,
    pub total_amount: String,
}

#[derive(Debug, Serialize)]
pub struct SalesReportResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub breakdown: Vec<KindBreakdownResponse>,
}

impl From<SalesReport> for SalesReportResponse {
    fn from(report: SalesReport) -> Self {
        Self {
            start_date: report.start_date,
            end_date: report.end_date,
            breakdown: report
                .breakdown
                .into_iter()
                .map(|entry| KindBreakdownResponse {
                    kind: entry.kind.to_string(),
                    document_count: entry.document_count,
                    subtotal: entry.subtotal.to_string(),
                    tax_amount: entry.tax_amount.to_string(),
                    total_amount: entry.total_amount.to_string(),
                })
                .collect(),
        }
    }
}
