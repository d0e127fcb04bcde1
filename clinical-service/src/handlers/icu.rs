use axum::extract::{Path, State};
use service_core::error::AppError;
use service_core::utils::Envelope;

use crate::models::IcuBed;
use crate::services::ClinicalError;
use crate::startup::AppState;

/// GET /api/icu/beds
pub async fn list_beds(State(state): State<AppState>) -> Envelope<Vec<IcuBed>> {
    Envelope::new(state.icu.beds().await)
}

/// GET /api/icu/beds/:bed_id
#[tracing::instrument(skip(state))]
pub async fn get_bed(
    State(state): State<AppState>,
    Path(bed_id): Path<String>,
) -> Result<Envelope<IcuBed>, AppError> {
    let bed = state
        .icu
        .bed(&bed_id)
        .await
        .ok_or(ClinicalError::BedNotFound(bed_id))?;
    Ok(Envelope::new(bed))
}
