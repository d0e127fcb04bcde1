//! Domain models for billing-service.

mod catalog;
mod invoice;
mod line_item;
mod patient;
mod scheme;
mod totals;

pub use catalog::CatalogItem;
pub use invoice::{
    CreateInvoice, Invoice, InvoiceDraft, InvoiceStatus, InvoiceType, ListInvoicesFilter,
    PaymentMethod, SchemeCoverage,
};
pub use line_item::{Discount, InvoiceItem, ItemType, DEFAULT_TAX_RATE};
pub use patient::{Gender, Patient};
pub use scheme::{Scheme, SchemeKind};
pub use totals::{InvoiceTotals, LineBreakdown};
