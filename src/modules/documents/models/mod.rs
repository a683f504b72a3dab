mod document;
mod line_item;
mod tax_spec;

pub use document::{
    CreateDocumentRequest, CreateLineItemRequest, DocumentKind, DocumentResponse, DocumentTotals,
    FinancialDocument, LineItemResponse, UpdateDocumentRequest,
};
pub use line_item::LineItem;
pub use tax_spec::{TaxAmounts, TaxSpec};
