use axum::extract::{Path, Query, State};
use service_core::error::AppError;
use service_core::utils::{clamp_limit, Envelope};
use uuid::Uuid;

use crate::dtos::SearchParams;
use crate::models::Patient;
use crate::services::BillingError;
use crate::startup::AppState;

/// GET /api/patients
#[tracing::instrument(skip(state))]
pub async fn search_patients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Envelope<Vec<Patient>> {
    let patients = state
        .billing
        .directory()
        .search_patients(params.search.as_deref(), clamp_limit(params.limit));
    Envelope::new(patients)
}

/// GET /api/patients/:id
#[tracing::instrument(skip(state))]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Envelope<Patient>, AppError> {
    let patient = state
        .billing
        .directory()
        .patient(patient_id)
        .cloned()
        .ok_or(BillingError::PatientNotFound(patient_id))?;
    Ok(Envelope::new(patient))
}
