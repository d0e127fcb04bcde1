//! Invoice total calculation.
//!
//! Every money component is rounded to paise (2 dp, midpoint away from zero)
//! as soon as it is derived. Aggregates are plain sums of rounded components,
//! so `final_amount = subtotal - total_discount + total_tax` and
//! `scheme_amount + patient_amount = final_amount` hold without drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Discount, InvoiceItem, InvoiceTotals, LineBreakdown};

/// Zero with money scale, so empty totals serialize as `"0.00"`.
pub const ZERO_MONEY: Decimal = Decimal::from_parts(0, 0, 0, false, 2);

/// Whether the invoice-level discount reduces the taxable base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBasis {
    /// Tax is computed on item-discounted lines; the invoice discount is
    /// subtracted afterwards and does not reduce tax.
    #[default]
    BeforeInvoiceDiscount,
    /// The invoice discount is prorated across lines by taxable share
    /// before tax is computed.
    AfterInvoiceDiscount,
}

impl TaxBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxBasis::BeforeInvoiceDiscount => "before_invoice_discount",
            TaxBasis::AfterInvoiceDiscount => "after_invoice_discount",
        }
    }
}

impl fmt::Display for TaxBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before_invoice_discount" => Ok(TaxBasis::BeforeInvoiceDiscount),
            "after_invoice_discount" => Ok(TaxBasis::AfterInvoiceDiscount),
            other => Err(format!(
                "unknown tax basis '{}', expected before_invoice_discount or after_invoice_discount",
                other
            )),
        }
    }
}

/// Round to paise and fix the scale at 2.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn percent_of(base: Decimal, percent: Decimal) -> Decimal {
    round_money(base * percent / Decimal::ONE_HUNDRED)
}

/// Discount amount on `base`, clamped to `[0, base]`.
fn discount_amount(discount: Option<&Discount>, base: Decimal) -> Decimal {
    let base = base.max(ZERO_MONEY);
    let amount = match discount {
        None => return ZERO_MONEY,
        Some(Discount::Percentage(pct)) => {
            percent_of(base, (*pct).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
        }
        Some(Discount::Fixed(value)) => round_money(*value),
    };
    amount.clamp(ZERO_MONEY, base)
}

/// Pure invoice calculator shared by previews and invoice creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceCalculator {
    tax_basis: TaxBasis,
}

impl InvoiceCalculator {
    pub fn new(tax_basis: TaxBasis) -> Self {
        Self { tax_basis }
    }

    pub fn tax_basis(&self) -> TaxBasis {
        self.tax_basis
    }

    /// Compute line and invoice totals. Never fails; inputs are expected to
    /// have passed `validate_items`, which bounds every line to
    /// `MAX_LINE_TOTAL` at paise precision. Out-of-range discounts or
    /// coverage are clamped rather than rejected.
    pub fn calculate(
        &self,
        items: &[InvoiceItem],
        invoice_discount: Option<&Discount>,
        coverage_percent: Option<Decimal>,
    ) -> InvoiceTotals {
        let mut lines: Vec<LineBreakdown> = items
            .iter()
            .map(|item| {
                let line_total = round_money(Decimal::from(item.quantity) * item.unit_price);
                let item_discount = discount_amount(item.discount.as_ref(), line_total);
                LineBreakdown {
                    code: item.code.clone(),
                    line_total,
                    item_discount,
                    invoice_discount_share: ZERO_MONEY,
                    taxable_amount: line_total - item_discount,
                    tax_rate: item.tax_rate,
                    item_tax: ZERO_MONEY,
                }
            })
            .collect();

        let discounted_subtotal = lines
            .iter()
            .fold(ZERO_MONEY, |acc, line| acc + line.taxable_amount);
        let invoice_discount = discount_amount(invoice_discount, discounted_subtotal);

        if self.tax_basis == TaxBasis::AfterInvoiceDiscount {
            allocate_invoice_discount(&mut lines, invoice_discount, discounted_subtotal);
        }

        for line in &mut lines {
            line.item_tax = percent_of(line.taxable_amount, line.tax_rate);
        }

        let subtotal = lines.iter().fold(ZERO_MONEY, |acc, l| acc + l.line_total);
        let item_discount = lines.iter().fold(ZERO_MONEY, |acc, l| acc + l.item_discount);
        let total_tax = lines.iter().fold(ZERO_MONEY, |acc, l| acc + l.item_tax);
        let total_discount = item_discount + invoice_discount;
        let final_amount = subtotal - total_discount + total_tax;

        let scheme_amount = coverage_percent
            .map(|coverage| {
                percent_of(
                    final_amount.max(ZERO_MONEY),
                    coverage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
                )
            })
            .unwrap_or(ZERO_MONEY);

        InvoiceTotals {
            lines,
            subtotal,
            item_discount,
            invoice_discount,
            total_discount,
            total_tax,
            final_amount,
            scheme_amount,
            patient_amount: final_amount - scheme_amount,
        }
    }
}

/// Spread `invoice_discount` over lines in proportion to their taxable
/// amount. The rounding remainder lands on the largest line so the shares
/// sum to the invoice discount exactly.
fn allocate_invoice_discount(lines: &mut [LineBreakdown], invoice_discount: Decimal, base: Decimal) {
    if invoice_discount.is_zero() || base <= Decimal::ZERO {
        return;
    }

    let largest = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.taxable_amount > Decimal::ZERO)
        .max_by(|(_, a), (_, b)| a.taxable_amount.cmp(&b.taxable_amount))
        .map(|(idx, _)| idx);

    let mut allocated = ZERO_MONEY;
    for line in lines.iter_mut() {
        if line.taxable_amount <= Decimal::ZERO {
            continue;
        }
        let share = round_money(invoice_discount * line.taxable_amount / base);
        line.invoice_discount_share = share.min(line.taxable_amount);
        allocated += line.invoice_discount_share;
    }

    let remainder = invoice_discount - allocated;
    if !remainder.is_zero() {
        if let Some(idx) = largest {
            let line = &mut lines[idx];
            line.invoice_discount_share =
                (line.invoice_discount_share + remainder).clamp(ZERO_MONEY, line.taxable_amount);
        }
    }

    for line in lines.iter_mut() {
        line.taxable_amount -= line.invoice_discount_share;
    }
}
