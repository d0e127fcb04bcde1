//! Domain errors for billing-service.

use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("Please select a patient")]
    MissingPatient,

    #[error("Patient {0} not found")]
    PatientNotFound(Uuid),

    #[error("At least one item is required")]
    NoItems,

    #[error("Item {code}: quantity must be between 1 and 100000")]
    InvalidQuantity { code: String },

    #[error("Item {code}: unit price cannot be negative")]
    NegativeUnitPrice { code: String },

    #[error("Item {code}: unit price cannot have more than 2 decimal places")]
    InvalidUnitPrice { code: String },

    #[error("Item {code}: line amount exceeds the billable limit")]
    AmountTooLarge { code: String },

    #[error("Item {code}: tax rate must be between 0 and 100")]
    InvalidTaxRate { code: String },

    #[error("{target}: percentage discount must be between 0 and 100")]
    InvalidDiscountPercentage { target: String },

    #[error("{target}: fixed discount cannot be negative")]
    NegativeDiscount { target: String },

    #[error("Scheme {0} not found")]
    UnknownScheme(Uuid),

    #[error("Scheme coverage must be between 0 and 100")]
    InvalidCoverage,

    #[error("Invoice {0} not found")]
    InvoiceNotFound(Uuid),

    #[error("Invoice {invoice_number} is {status} and cannot be {action}")]
    InvalidTransition {
        invoice_number: String,
        status: &'static str,
        action: &'static str,
    },
}

impl BillingError {
    /// Short label used for the error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            BillingError::MissingPatient => "missing_patient",
            BillingError::PatientNotFound(_) => "patient_not_found",
            BillingError::NoItems => "no_items",
            BillingError::InvalidQuantity { .. } => "invalid_quantity",
            BillingError::NegativeUnitPrice { .. } => "negative_unit_price",
            BillingError::InvalidUnitPrice { .. } => "invalid_unit_price",
            BillingError::AmountTooLarge { .. } => "amount_too_large",
            BillingError::InvalidTaxRate { .. } => "invalid_tax_rate",
            BillingError::InvalidDiscountPercentage { .. } => "invalid_discount_percentage",
            BillingError::NegativeDiscount { .. } => "negative_discount",
            BillingError::UnknownScheme(_) => "unknown_scheme",
            BillingError::InvalidCoverage => "invalid_coverage",
            BillingError::InvoiceNotFound(_) => "invoice_not_found",
            BillingError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::PatientNotFound(_)
            | BillingError::UnknownScheme(_)
            | BillingError::InvoiceNotFound(_) => AppError::NotFound(anyhow::anyhow!(err)),
            BillingError::InvalidTransition { .. } => AppError::Conflict(anyhow::anyhow!(err)),
            _ => AppError::BadRequest(anyhow::anyhow!(err)),
        }
    }
}
