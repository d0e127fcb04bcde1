//! Business-rule checks run before totals are computed.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::BillingError;
use crate::models::{Discount, InvoiceItem};

/// Largest quantity accepted on a single line.
pub const MAX_QUANTITY: u32 = 100_000;

/// Largest `quantity × unit_price` accepted on a single line. Keeps every
/// downstream sum and percentage well inside `Decimal` range.
pub const MAX_LINE_TOTAL: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1e12

/// Checks a draft invoice is ready to be saved: a patient is selected and
/// every line and discount is in range.
pub fn validate_draft(
    patient_id: Option<Uuid>,
    items: &[InvoiceItem],
    invoice_discount: Option<&Discount>,
) -> Result<Uuid, BillingError> {
    let patient_id = patient_id.ok_or(BillingError::MissingPatient)?;
    if items.is_empty() {
        return Err(BillingError::NoItems);
    }
    validate_items(items, invoice_discount)?;
    Ok(patient_id)
}

/// Range checks on lines and discounts. An empty list is accepted, which
/// lets the dashboard preview totals while a bill is being built.
pub fn validate_items(
    items: &[InvoiceItem],
    invoice_discount: Option<&Discount>,
) -> Result<(), BillingError> {
    for item in items {
        if item.quantity == 0 || item.quantity > MAX_QUANTITY {
            return Err(BillingError::InvalidQuantity {
                code: item.code.clone(),
            });
        }
        if item.unit_price < Decimal::ZERO {
            return Err(BillingError::NegativeUnitPrice {
                code: item.code.clone(),
            });
        }
        // Money is kept in paise.
        if item.unit_price.normalize().scale() > 2 {
            return Err(BillingError::InvalidUnitPrice {
                code: item.code.clone(),
            });
        }
        let within_limit = Decimal::from(item.quantity)
            .checked_mul(item.unit_price)
            .is_some_and(|line_total| line_total <= MAX_LINE_TOTAL);
        if !within_limit {
            return Err(BillingError::AmountTooLarge {
                code: item.code.clone(),
            });
        }
        if !is_percentage(item.tax_rate) {
            return Err(BillingError::InvalidTaxRate {
                code: item.code.clone(),
            });
        }
        if let Some(discount) = &item.discount {
            validate_discount(discount, || format!("Item {}", item.code))?;
        }
    }

    if let Some(discount) = invoice_discount {
        validate_discount(discount, || "Invoice".to_string())?;
    }

    Ok(())
}

pub fn validate_coverage(coverage_percent: Decimal) -> Result<(), BillingError> {
    if is_percentage(coverage_percent) {
        Ok(())
    } else {
        Err(BillingError::InvalidCoverage)
    }
}

fn validate_discount(
    discount: &Discount,
    target: impl FnOnce() -> String,
) -> Result<(), BillingError> {
    match discount {
        Discount::Percentage(pct) if !is_percentage(*pct) => {
            Err(BillingError::InvalidDiscountPercentage { target: target() })
        }
        Discount::Fixed(amount) if *amount < Decimal::ZERO => {
            Err(BillingError::NegativeDiscount { target: target() })
        }
        _ => Ok(()),
    }
}

fn is_percentage(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;

    fn consultation() -> InvoiceItem {
        InvoiceItem {
            item_type: ItemType::Consultation,
            code: "CONS-GEN".to_string(),
            name: "General consultation".to_string(),
            quantity: 1,
            unit_price: Decimal::from(500),
            discount: None,
            discount_reason: None,
            tax_rate: Decimal::from(18),
        }
    }

    #[test]
    fn patient_is_required() {
        let result = validate_draft(None, &[consultation()], None);
        assert_eq!(result, Err(BillingError::MissingPatient));
    }

    #[test]
    fn at_least_one_item_is_required() {
        let result = validate_draft(Some(Uuid::new_v4()), &[], None);
        assert_eq!(result, Err(BillingError::NoItems));
    }

    #[test]
    fn valid_draft_returns_patient() {
        let patient_id = Uuid::new_v4();
        assert_eq!(
            validate_draft(Some(patient_id), &[consultation()], None),
            Ok(patient_id)
        );
    }

    #[test]
    fn rejects_zero_quantity_and_negative_price() {
        let mut item = consultation();
        item.quantity = 0;
        assert!(matches!(
            validate_items(&[item], None),
            Err(BillingError::InvalidQuantity { .. })
        ));

        let mut item = consultation();
        item.unit_price = Decimal::from(-1);
        assert!(matches!(
            validate_items(&[item], None),
            Err(BillingError::NegativeUnitPrice { .. })
        ));
    }

    #[test]
    fn rejects_quantity_above_limit() {
        let mut item = consultation();
        item.quantity = MAX_QUANTITY + 1;
        assert!(matches!(
            validate_items(&[item], None),
            Err(BillingError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn rejects_sub_paise_unit_price() {
        let mut item = consultation();
        item.unit_price = Decimal::new(4, 3); // 0.004
        assert_eq!(
            validate_items(&[item], None),
            Err(BillingError::InvalidUnitPrice {
                code: "CONS-GEN".to_string()
            })
        );

        // Trailing zeros are not extra precision.
        let mut item = consultation();
        item.unit_price = Decimal::new(12_500, 4); // 1.2500
        assert!(validate_items(&[item], None).is_ok());
    }

    #[test]
    fn rejects_line_totals_beyond_limit() {
        let mut item = consultation();
        item.quantity = 5;
        item.unit_price = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        assert_eq!(
            validate_items(&[item], None),
            Err(BillingError::AmountTooLarge {
                code: "CONS-GEN".to_string()
            })
        );

        let mut item = consultation();
        item.quantity = 10;
        item.unit_price = Decimal::from(100_000_000_000_i64); // 1e11 per unit
        assert!(validate_items(&[item], None).is_ok());

        let mut item = consultation();
        item.quantity = 11;
        item.unit_price = Decimal::from(100_000_000_000_i64);
        assert!(matches!(
            validate_items(&[item], None),
            Err(BillingError::AmountTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_tax_and_discounts() {
        let mut item = consultation();
        item.tax_rate = Decimal::from(120);
        assert!(matches!(
            validate_items(&[item], None),
            Err(BillingError::InvalidTaxRate { .. })
        ));

        let mut item = consultation();
        item.discount = Some(Discount::Percentage(Decimal::from(101)));
        assert_eq!(
            validate_items(&[item], None),
            Err(BillingError::InvalidDiscountPercentage {
                target: "Item CONS-GEN".to_string()
            })
        );

        let discount = Discount::Fixed(Decimal::from(-10));
        assert_eq!(
            validate_items(&[consultation()], Some(&discount)),
            Err(BillingError::NegativeDiscount {
                target: "Invoice".to_string()
            })
        );
    }

    #[test]
    fn fixed_discount_above_subtotal_is_allowed() {
        let discount = Discount::Fixed(Decimal::from(10_000));
        assert!(validate_items(&[consultation()], Some(&discount)).is_ok());
    }

    #[test]
    fn coverage_bounds() {
        assert!(validate_coverage(Decimal::ZERO).is_ok());
        assert!(validate_coverage(Decimal::ONE_HUNDRED).is_ok());
        assert_eq!(
            validate_coverage(Decimal::from(150)),
            Err(BillingError::InvalidCoverage)
        );
    }
}
