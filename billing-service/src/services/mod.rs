//! Services module for billing-service.

pub mod billing;
pub mod calculator;
pub mod directory;
pub mod error;
pub mod metrics;
pub mod store;
pub mod validation;

pub use billing::{BillingService, InvoiceQuote};
pub use calculator::{round_money, InvoiceCalculator, TaxBasis, ZERO_MONEY};
pub use directory::{seed_patient_id, seed_scheme_id, Directory};
pub use error::BillingError;
pub use metrics::{get_metrics, init_metrics};
pub use store::InvoiceStore;
