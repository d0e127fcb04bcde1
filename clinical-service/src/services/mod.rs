//! Services module for clinical-service.

pub mod error;
pub mod icu_monitor;
pub mod lab_flags;
pub mod metrics;

pub use error::ClinicalError;
pub use icu_monitor::{derive_status, IcuMonitor};
pub use lab_flags::{flag_value, LabCatalog};
pub use metrics::{get_metrics, init_metrics};
