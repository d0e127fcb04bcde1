//! Patient directory entry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Registered patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: Uuid,
    /// Hospital-wide unique health id.
    pub uhid: String,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub phone: String,
    pub blood_group: Option<String>,
}
