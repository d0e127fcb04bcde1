//! Domain models for clinical-service.

mod lab;
mod vitals;

pub use lab::{FlaggedResult, LabFlag, LabParameter, LabReading, ReferenceRange, Sex};
pub use vitals::{BedStatus, IcuBed, Vitals};
