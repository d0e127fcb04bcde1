use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// Inclusive normal range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
}

impl ReferenceRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabParameter {
    pub code: String,
    pub name: String,
    pub unit: String,
    pub range: ReferenceRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub male_range: Option<ReferenceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub female_range: Option<ReferenceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_high: Option<f64>,
}

impl LabParameter {
    /// Range for `sex`, falling back to the general range.
    pub fn range_for(&self, sex: Option<Sex>) -> ReferenceRange {
        match sex {
            Some(Sex::Male) => self.male_range.unwrap_or(self.range),
            Some(Sex::Female) => self.female_range.unwrap_or(self.range),
            Some(Sex::Other) | None => self.range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabFlag {
    CriticalLow,
    Low,
    Normal,
    High,
    CriticalHigh,
}

impl LabFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabFlag::CriticalLow => "critical_low",
            LabFlag::Low => "low",
            LabFlag::Normal => "normal",
            LabFlag::High => "high",
            LabFlag::CriticalHigh => "critical_high",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, LabFlag::CriticalLow | LabFlag::CriticalHigh)
    }
}

/// One submitted measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReading {
    pub parameter_code: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedResult {
    pub parameter_code: String,
    pub parameter_name: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: ReferenceRange,
    pub flag: LabFlag,
    pub is_critical: bool,
}
