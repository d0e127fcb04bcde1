//! Domain errors for clinical-service.

use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClinicalError {
    #[error("Unknown lab parameter '{0}'")]
    UnknownParameter(String),

    #[error("Lab parameter {code}: value must be a finite number")]
    InvalidValue { code: String },

    #[error("ICU bed '{0}' not found")]
    BedNotFound(String),
}

impl ClinicalError {
    /// Short label used for the error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            ClinicalError::UnknownParameter(_) => "unknown_parameter",
            ClinicalError::InvalidValue { .. } => "invalid_value",
            ClinicalError::BedNotFound(_) => "bed_not_found",
        }
    }
}

impl From<ClinicalError> for AppError {
    fn from(err: ClinicalError) -> Self {
        match err {
            ClinicalError::BedNotFound(_) => AppError::NotFound(anyhow::anyhow!(err)),
            _ => AppError::BadRequest(anyhow::anyhow!(err)),
        }
    }
}
