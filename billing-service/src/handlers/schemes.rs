use axum::extract::State;
use service_core::utils::Envelope;

use crate::models::Scheme;
use crate::startup::AppState;

/// GET /api/schemes
pub async fn list_schemes(State(state): State<AppState>) -> Envelope<Vec<Scheme>> {
    Envelope::new(state.billing.directory().schemes().to_vec())
}
