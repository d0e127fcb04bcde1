//! Invoice model for billing-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Discount, InvoiceItem, InvoiceTotals};

/// Billing context of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Opd,
    Ipd,
    Pharmacy,
    Lab,
    Emergency,
    Package,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Opd => "opd",
            InvoiceType::Ipd => "ipd",
            InvoiceType::Pharmacy => "pharmacy",
            InvoiceType::Lab => "lab",
            InvoiceType::Emergency => "emergency",
            InvoiceType::Package => "package",
        }
    }
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

/// How the patient share is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    NetBanking,
    Insurance,
    Scheme,
}

/// Government or insurance scheme applied to an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeCoverage {
    pub scheme_id: Uuid,
    pub scheme_code: String,
    pub scheme_name: String,
    pub coverage_percent: Decimal,
}

/// Invoice document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub invoice_type: InvoiceType,
    pub status: InvoiceStatus,
    pub currency: String,
    pub items: Vec<InvoiceItem>,
    pub discount: Option<Discount>,
    pub discount_reason: Option<String>,
    pub scheme: Option<SchemeCoverage>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub totals: InvoiceTotals,
    pub created_utc: DateTime<Utc>,
    pub paid_utc: Option<DateTime<Utc>>,
    pub cancelled_utc: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

/// Invoice as entered at the billing desk, before validation.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub patient_id: Option<Uuid>,
    pub invoice_type: InvoiceType,
    pub items: Vec<InvoiceItem>,
    pub discount: Option<Discount>,
    pub discount_reason: Option<String>,
    pub scheme_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Validated input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub invoice_type: InvoiceType,
    pub items: Vec<InvoiceItem>,
    pub discount: Option<Discount>,
    pub discount_reason: Option<String>,
    pub scheme: Option<SchemeCoverage>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub totals: InvoiceTotals,
}

/// Filter parameters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct ListInvoicesFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
    pub search: Option<String>,
    pub limit: usize,
}
