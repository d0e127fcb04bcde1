//! Lab result range flagging.
//!
//! A value is `normal` when it lies inside the reference range, endpoints
//! included. Critical limits take precedence over the plain low/high flags.

use service_core::utils::matches_query;
use tracing::{info, instrument, warn};

use super::metrics::{ERRORS_TOTAL, LAB_FLAGS_TOTAL};
use super::ClinicalError;
use crate::models::{FlaggedResult, LabFlag, LabParameter, LabReading, ReferenceRange, Sex};

/// Classify `value` against a reference range and optional critical limits.
pub fn flag_value(
    value: f64,
    range: ReferenceRange,
    critical_low: Option<f64>,
    critical_high: Option<f64>,
) -> LabFlag {
    if critical_low.is_some_and(|limit| value < limit) {
        LabFlag::CriticalLow
    } else if value < range.low {
        LabFlag::Low
    } else if critical_high.is_some_and(|limit| value > limit) {
        LabFlag::CriticalHigh
    } else if value > range.high {
        LabFlag::High
    } else {
        LabFlag::Normal
    }
}

#[derive(Debug, Clone, Default)]
pub struct LabCatalog {
    parameters: Vec<LabParameter>,
}

impl LabCatalog {
    pub fn new(parameters: Vec<LabParameter>) -> Self {
        Self { parameters }
    }

    /// Catalog populated with the built-in parameter set.
    pub fn seeded() -> Self {
        Self::new(seed_parameters())
    }

    /// Lookup by code, ignoring case.
    pub fn parameter(&self, code: &str) -> Option<&LabParameter> {
        let code = code.trim();
        self.parameters
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))
    }

    pub fn search(&self, query: Option<&str>, limit: usize) -> Vec<LabParameter> {
        self.parameters
            .iter()
            .filter(|p| matches_query(query, &[&p.name, &p.code]))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Flag every reading. Fails on the first unknown parameter code so a
    /// report is never returned partially evaluated.
    #[instrument(skip(self, readings), fields(readings = readings.len()))]
    pub fn evaluate(
        &self,
        sex: Option<Sex>,
        readings: &[LabReading],
    ) -> Result<Vec<FlaggedResult>, ClinicalError> {
        let results = readings
            .iter()
            .map(|reading| self.evaluate_one(sex, reading))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| {
                warn!(error = %err, "Lab evaluation rejected");
                ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();
            })?;

        for result in &results {
            LAB_FLAGS_TOTAL.with_label_values(&[result.flag.as_str()]).inc();
        }

        let critical = results.iter().filter(|r| r.is_critical).count();
        if critical > 0 {
            info!(critical, "Critical lab values detected");
        }

        Ok(results)
    }

    fn evaluate_one(
        &self,
        sex: Option<Sex>,
        reading: &LabReading,
    ) -> Result<FlaggedResult, ClinicalError> {
        let parameter = self
            .parameter(&reading.parameter_code)
            .ok_or_else(|| ClinicalError::UnknownParameter(reading.parameter_code.clone()))?;
        if !reading.value.is_finite() {
            return Err(ClinicalError::InvalidValue {
                code: parameter.code.clone(),
            });
        }

        let range = parameter.range_for(sex);
        let flag = flag_value(
            reading.value,
            range,
            parameter.critical_low,
            parameter.critical_high,
        );

        Ok(FlaggedResult {
            parameter_code: parameter.code.clone(),
            parameter_name: parameter.name.clone(),
            value: reading.value,
            unit: parameter.unit.clone(),
            reference_range: range,
            flag,
            is_critical: flag.is_critical(),
        })
    }
}

struct Seed {
    code: &'static str,
    name: &'static str,
    unit: &'static str,
    range: (f64, f64),
    male: Option<(f64, f64)>,
    female: Option<(f64, f64)>,
    critical: (Option<f64>, Option<f64>),
}

impl From<Seed> for LabParameter {
    fn from(seed: Seed) -> Self {
        let range = |(low, high): (f64, f64)| ReferenceRange::new(low, high);
        LabParameter {
            code: seed.code.to_string(),
            name: seed.name.to_string(),
            unit: seed.unit.to_string(),
            range: range(seed.range),
            male_range: seed.male.map(range),
            female_range: seed.female.map(range),
            critical_low: seed.critical.0,
            critical_high: seed.critical.1,
        }
    }
}

fn seed_parameters() -> Vec<LabParameter> {
    let seeds = [
        Seed {
            code: "HGB",
            name: "Hemoglobin",
            unit: "g/dL",
            range: (12.0, 17.5),
            male: Some((13.5, 17.5)),
            female: Some((12.0, 15.5)),
            critical: (Some(7.0), Some(20.0)),
        },
        Seed {
            code: "WBC",
            name: "White Blood Cell Count",
            unit: "10^3/uL",
            range: (4.0, 11.0),
            male: None,
            female: None,
            critical: (Some(2.0), Some(30.0)),
        },
        Seed {
            code: "PLT",
            name: "Platelet Count",
            unit: "10^3/uL",
            range: (150.0, 450.0),
            male: None,
            female: None,
            critical: (Some(50.0), Some(1000.0)),
        },
        Seed {
            code: "FBS",
            name: "Fasting Blood Sugar",
            unit: "mg/dL",
            range: (70.0, 100.0),
            male: None,
            female: None,
            critical: (Some(40.0), Some(400.0)),
        },
        Seed {
            code: "HBA1C",
            name: "HbA1c",
            unit: "%",
            range: (4.0, 5.6),
            male: None,
            female: None,
            critical: (None, None),
        },
        Seed {
            code: "CREAT",
            name: "Serum Creatinine",
            unit: "mg/dL",
            range: (0.59, 1.35),
            male: Some((0.74, 1.35)),
            female: Some((0.59, 1.04)),
            critical: (None, Some(10.0)),
        },
        Seed {
            code: "NA",
            name: "Sodium",
            unit: "mmol/L",
            range: (135.0, 145.0),
            male: None,
            female: None,
            critical: (Some(120.0), Some(160.0)),
        },
        Seed {
            code: "K",
            name: "Potassium",
            unit: "mmol/L",
            range: (3.5, 5.0),
            male: None,
            female: None,
            critical: (Some(2.5), Some(6.5)),
        },
        Seed {
            code: "TSH",
            name: "Thyroid Stimulating Hormone",
            unit: "mIU/L",
            range: (0.4, 4.0),
            male: None,
            female: None,
            critical: (None, None),
        },
        Seed {
            code: "ALT",
            name: "Alanine Aminotransferase",
            unit: "U/L",
            range: (7.0, 56.0),
            male: None,
            female: None,
            critical: (None, Some(1000.0)),
        },
        Seed {
            code: "TBIL",
            name: "Total Bilirubin",
            unit: "mg/dL",
            range: (0.1, 1.2),
            male: None,
            female: None,
            critical: (None, Some(15.0)),
        },
        Seed {
            code: "CHOL",
            name: "Total Cholesterol",
            unit: "mg/dL",
            range: (0.0, 200.0),
            male: None,
            female: None,
            critical: (None, None),
        },
    ];

    seeds.into_iter().map(LabParameter::from).collect()
}
