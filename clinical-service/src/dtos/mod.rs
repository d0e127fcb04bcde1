use serde::Deserialize;
use validator::Validate;

use crate::models::{LabReading, Sex};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EvaluateLabResultsRequest {
    pub sex: Option<Sex>,
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 results are required"))]
    pub results: Vec<LabReading>,
}
