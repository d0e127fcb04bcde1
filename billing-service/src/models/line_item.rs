//! Line item model for billing-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GST rate applied when a line carries no explicit rate.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// Kind of billable unit on an invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Consultation,
    Procedure,
    Medicine,
    LabTest,
    BedCharge,
    Service,
    Other,
}

/// Discount applied to a line or to a whole invoice.
///
/// Serialized as `{"kind": "percentage", "value": "10"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Percent of the base amount, 0..=100.
    Percentage(Decimal),
    /// Absolute amount in invoice currency.
    Fixed(Decimal),
}

/// A billable line on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub item_type: ItemType,
    pub code: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_reason: Option<String>,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,
}

fn default_tax_rate() -> Decimal {
    DEFAULT_TAX_RATE
}
