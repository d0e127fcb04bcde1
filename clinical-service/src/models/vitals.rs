use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Beats per minute.
    pub heart_rate: u32,
    /// mmHg.
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    /// Oxygen saturation, percent.
    pub spo2: u32,
    /// Breaths per minute.
    pub respiratory_rate: u32,
    /// Degrees Celsius, one decimal place.
    pub temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedStatus {
    Stable,
    Warning,
    Critical,
}

impl BedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BedStatus::Stable => "stable",
            BedStatus::Warning => "warning",
            BedStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcuBed {
    pub bed_id: String,
    pub patient_name: String,
    pub diagnosis: String,
    pub vitals: Vitals,
    pub status: BedStatus,
    pub updated_utc: DateTime<Utc>,
}
