mod report;

pub use report::{
    DashboardSummary, DashboardSummaryResponse, KindBreakdown, KindBreakdownResponse,
    SalesReport, SalesReportQuery, SalesReportResponse, StageBreakdown, StageBreakdownResponse,
};
