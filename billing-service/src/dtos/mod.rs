pub mod directory;
pub mod invoices;

pub use directory::{CatalogSearchParams, SearchParams};
pub use invoices::{
    CancelInvoiceRequest, CreateInvoiceRequest, InvoiceItemRequest, ListInvoicesParams,
    PreviewResponse,
};
