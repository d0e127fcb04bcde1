//! Invoice handlers.
//!
//! Create and preview share one request body; preview prices the draft
//! without a patient and without storing anything.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use service_core::utils::{clamp_limit, Envelope};
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{CancelInvoiceRequest, CreateInvoiceRequest, ListInvoicesParams, PreviewResponse};
use crate::models::{Invoice, ListInvoicesFilter};
use crate::startup::AppState;

/// Price a draft invoice.
///
/// POST /api/invoices/preview
#[tracing::instrument(skip(state, request))]
pub async fn preview_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Envelope<PreviewResponse>, AppError> {
    request.validate()?;

    let draft = request.into_draft(state.config.billing.default_tax_rate);
    let quote = state.billing.preview(&draft)?;

    Ok(Envelope::new(PreviewResponse {
        tax_basis: state.billing.calculator().tax_basis(),
        currency: state.billing.currency().to_string(),
        scheme: quote.scheme,
        totals: quote.totals,
    }))
}

/// Create a pending invoice.
///
/// POST /api/invoices
#[tracing::instrument(skip(state, request))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Envelope<Invoice>), AppError> {
    request.validate()?;

    let draft = request.into_draft(state.config.billing.default_tax_rate);
    let invoice = state.billing.create_invoice(draft)?;

    Ok((StatusCode::CREATED, Envelope::new(invoice)))
}

/// GET /api/invoices
#[tracing::instrument(skip(state))]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListInvoicesParams>,
) -> Envelope<Vec<Invoice>> {
    let filter = ListInvoicesFilter {
        patient_id: params.patient_id,
        status: params.status,
        search: params.search,
        limit: clamp_limit(params.limit),
    };
    Envelope::new(state.billing.list_invoices(&filter))
}

/// GET /api/invoices/:id
#[tracing::instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Envelope<Invoice>, AppError> {
    Ok(Envelope::new(state.billing.get_invoice(invoice_id)?))
}

/// POST /api/invoices/:id/pay
#[tracing::instrument(skip(state))]
pub async fn pay_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Envelope<Invoice>, AppError> {
    Ok(Envelope::new(state.billing.mark_paid(invoice_id)?))
}

/// Cancel a pending invoice. The body is optional.
///
/// POST /api/invoices/:id/cancel
#[tracing::instrument(skip(state, request))]
pub async fn cancel_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    request: Option<Json<CancelInvoiceRequest>>,
) -> Result<Envelope<Invoice>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    request.validate()?;

    Ok(Envelope::new(state.billing.cancel(invoice_id, request.reason)?))
}
