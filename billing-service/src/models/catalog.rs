//! Billable service and medicine catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ItemType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub code: String,
    pub name: String,
    pub item_type: ItemType,
    pub department: String,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}
