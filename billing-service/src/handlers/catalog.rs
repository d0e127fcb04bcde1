use axum::extract::{Query, State};
use service_core::utils::{clamp_limit, Envelope};

use crate::dtos::CatalogSearchParams;
use crate::models::CatalogItem;
use crate::startup::AppState;

/// GET /api/catalog/items
#[tracing::instrument(skip(state))]
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogSearchParams>,
) -> Envelope<Vec<CatalogItem>> {
    let items = state.billing.directory().search_catalog(
        params.search.as_deref(),
        params.item_type,
        clamp_limit(params.limit),
    );
    Envelope::new(items)
}
