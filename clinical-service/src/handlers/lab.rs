use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;
use service_core::utils::{clamp_limit, Envelope};
use validator::Validate;

use crate::dtos::{EvaluateLabResultsRequest, SearchParams};
use crate::models::{FlaggedResult, LabParameter};
use crate::startup::AppState;

/// GET /api/lab/parameters
#[tracing::instrument(skip(state))]
pub async fn search_parameters(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Envelope<Vec<LabParameter>> {
    Envelope::new(
        state
            .lab
            .search(params.search.as_deref(), clamp_limit(params.limit)),
    )
}

/// Flag submitted lab values against their reference ranges.
///
/// POST /api/lab/results/evaluate
#[tracing::instrument(skip(state, request))]
pub async fn evaluate_results(
    State(state): State<AppState>,
    Json(request): Json<EvaluateLabResultsRequest>,
) -> Result<Envelope<Vec<FlaggedResult>>, AppError> {
    request.validate()?;

    let results = state.lab.evaluate(request.sex, &request.results)?;
    Ok(Envelope::new(results))
}
