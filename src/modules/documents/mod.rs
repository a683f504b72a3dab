// Financial documents: quotations, sales orders and invoices share one
// header/lines model; `kind` discriminates.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{DocumentKind, DocumentTotals, FinancialDocument, LineItem, TaxSpec};
pub use repositories::{DocumentRepository, MySqlDocumentRepository};
pub use services::DocumentService;
