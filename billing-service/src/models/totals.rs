//! Computed invoice amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amounts derived for a single invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub code: String,
    pub line_total: Decimal,
    pub item_discount: Decimal,
    /// Share of the invoice-level discount carried by this line. Non-zero
    /// only when tax is computed after the invoice discount.
    pub invoice_discount_share: Decimal,
    pub taxable_amount: Decimal,
    pub tax_rate: Decimal,
    pub item_tax: Decimal,
}

/// Invoice-level totals.
///
/// `final_amount = subtotal - total_discount + total_tax` and
/// `scheme_amount + patient_amount = final_amount` always hold exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub lines: Vec<LineBreakdown>,
    pub subtotal: Decimal,
    pub item_discount: Decimal,
    pub invoice_discount: Decimal,
    pub total_discount: Decimal,
    pub total_tax: Decimal,
    pub final_amount: Decimal,
    pub scheme_amount: Decimal,
    pub patient_amount: Decimal,
}
