use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    Discount, InvoiceDraft, InvoiceItem, InvoiceStatus, InvoiceTotals, InvoiceType, ItemType,
    PaymentMethod, SchemeCoverage,
};
use crate::services::TaxBasis;

#[derive(Debug, Deserialize, Validate)]
pub struct InvoiceItemRequest {
    pub item_type: ItemType,
    #[validate(length(min = 1, max = 64, message = "Item code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount: Option<Discount>,
    #[validate(length(max = 500))]
    pub discount_reason: Option<String>,
    /// Falls back to the configured default GST rate.
    pub tax_rate: Option<Decimal>,
}

impl InvoiceItemRequest {
    pub fn into_item(self, default_tax_rate: Decimal) -> InvoiceItem {
        InvoiceItem {
            item_type: self.item_type,
            code: self.code,
            name: self.name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            discount_reason: self.discount_reason,
            tax_rate: self.tax_rate.unwrap_or(default_tax_rate),
        }
    }
}

/// Body of both `POST /api/invoices` and `POST /api/invoices/preview`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub patient_id: Option<Uuid>,
    #[serde(default = "default_invoice_type")]
    pub invoice_type: InvoiceType,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<InvoiceItemRequest>,
    pub discount: Option<Discount>,
    #[validate(length(max = 500))]
    pub discount_reason: Option<String>,
    pub scheme_id: Option<Uuid>,
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

fn default_invoice_type() -> InvoiceType {
    InvoiceType::Opd
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Cash
}

impl CreateInvoiceRequest {
    pub fn into_draft(self, default_tax_rate: Decimal) -> InvoiceDraft {
        InvoiceDraft {
            patient_id: self.patient_id,
            invoice_type: self.invoice_type,
            items: self
                .items
                .into_iter()
                .map(|item| item.into_item(default_tax_rate))
                .collect(),
            discount: self.discount,
            discount_reason: self.discount_reason,
            scheme_id: self.scheme_id,
            payment_method: self.payment_method,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelInvoiceRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListInvoicesParams {
    pub patient_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub tax_basis: TaxBasis,
    pub currency: String,
    pub scheme: Option<SchemeCoverage>,
    #[serde(flatten)]
    pub totals: InvoiceTotals,
}
