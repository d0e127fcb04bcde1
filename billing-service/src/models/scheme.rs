//! Government and insurance schemes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    Government,
    Insurance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheme {
    pub scheme_id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: SchemeKind,
    pub coverage_percent: Decimal,
}
