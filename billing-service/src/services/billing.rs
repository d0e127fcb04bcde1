//! Billing desk operations: previews, invoice creation, and settlement.

use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::metrics::{
    ERRORS_TOTAL, INVOICES_TOTAL, INVOICE_AMOUNT_TOTAL, PREVIEWS_TOTAL, SCHEME_AMOUNT_TOTAL,
};
use super::validation::{validate_coverage, validate_draft, validate_items};
use super::{BillingError, Directory, InvoiceCalculator, InvoiceStore};
use crate::models::{
    CreateInvoice, Invoice, InvoiceDraft, InvoiceTotals, ListInvoicesFilter, SchemeCoverage,
};

/// Totals for a draft that has not been saved.
#[derive(Debug, Clone)]
pub struct InvoiceQuote {
    pub scheme: Option<SchemeCoverage>,
    pub totals: InvoiceTotals,
}

#[derive(Clone)]
pub struct BillingService {
    directory: Arc<Directory>,
    store: InvoiceStore,
    calculator: InvoiceCalculator,
    currency: String,
}

impl BillingService {
    pub fn new(
        directory: Arc<Directory>,
        store: InvoiceStore,
        calculator: InvoiceCalculator,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            store,
            calculator,
            currency: currency.into(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn store(&self) -> &InvoiceStore {
        &self.store
    }

    pub fn calculator(&self) -> InvoiceCalculator {
        self.calculator
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    fn resolve_scheme(
        &self,
        scheme_id: Option<Uuid>,
    ) -> Result<Option<SchemeCoverage>, BillingError> {
        let Some(scheme_id) = scheme_id else {
            return Ok(None);
        };
        let scheme = self
            .directory
            .scheme(scheme_id)
            .ok_or(BillingError::UnknownScheme(scheme_id))?;
        validate_coverage(scheme.coverage_percent)?;

        Ok(Some(SchemeCoverage {
            scheme_id: scheme.scheme_id,
            scheme_code: scheme.code.clone(),
            scheme_name: scheme.name.clone(),
            coverage_percent: scheme.coverage_percent,
        }))
    }

    /// Compute totals for a bill still being assembled. The patient is not
    /// required and an empty item list yields zero totals.
    #[instrument(skip(self, draft), fields(items = draft.items.len()))]
    pub fn preview(&self, draft: &InvoiceDraft) -> Result<InvoiceQuote, BillingError> {
        let quote = validate_items(&draft.items, draft.discount.as_ref())
            .and_then(|_| self.resolve_scheme(draft.scheme_id))
            .map(|scheme| {
                let totals = self.calculator.calculate(
                    &draft.items,
                    draft.discount.as_ref(),
                    scheme.as_ref().map(|s| s.coverage_percent),
                );
                InvoiceQuote { scheme, totals }
            })
            .inspect_err(record_error)?;

        PREVIEWS_TOTAL
            .with_label_values(&[self.calculator.tax_basis().as_str()])
            .inc();

        Ok(quote)
    }

    /// Validate, price, and store a new invoice.
    #[instrument(skip(self, draft), fields(patient_id = ?draft.patient_id, items = draft.items.len()))]
    pub fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, BillingError> {
        let input = self.price_draft(draft).inspect_err(record_error)?;
        let invoice = self.store.create_invoice(input);

        INVOICES_TOTAL
            .with_label_values(&[invoice.invoice_type.as_str(), invoice.status.as_str()])
            .inc();
        INVOICE_AMOUNT_TOTAL
            .with_label_values(&[&invoice.currency])
            .inc_by(invoice.totals.final_amount.to_f64().unwrap_or(0.0).max(0.0));
        if let Some(scheme) = &invoice.scheme {
            SCHEME_AMOUNT_TOTAL
                .with_label_values(&[&scheme.scheme_code])
                .inc_by(invoice.totals.scheme_amount.to_f64().unwrap_or(0.0).max(0.0));
        }

        Ok(invoice)
    }

    fn price_draft(&self, draft: InvoiceDraft) -> Result<CreateInvoice, BillingError> {
        let patient_id = validate_draft(draft.patient_id, &draft.items, draft.discount.as_ref())?;
        let patient = self
            .directory
            .patient(patient_id)
            .ok_or(BillingError::PatientNotFound(patient_id))?;
        let scheme = self.resolve_scheme(draft.scheme_id)?;

        let totals = self.calculator.calculate(
            &draft.items,
            draft.discount.as_ref(),
            scheme.as_ref().map(|s| s.coverage_percent),
        );

        Ok(CreateInvoice {
            patient_id,
            patient_name: patient.name.clone(),
            invoice_type: draft.invoice_type,
            items: draft.items,
            discount: draft.discount,
            discount_reason: draft.discount_reason,
            scheme,
            payment_method: draft.payment_method,
            notes: draft.notes,
            totals,
        })
    }

    pub fn get_invoice(&self, invoice_id: Uuid) -> Result<Invoice, BillingError> {
        self.store
            .get_invoice(invoice_id)
            .ok_or(BillingError::InvoiceNotFound(invoice_id))
    }

    pub fn list_invoices(&self, filter: &ListInvoicesFilter) -> Vec<Invoice> {
        self.store.list_invoices(filter)
    }

    pub fn mark_paid(&self, invoice_id: Uuid) -> Result<Invoice, BillingError> {
        let invoice = self.store.mark_paid(invoice_id).inspect_err(record_error)?;
        INVOICES_TOTAL
            .with_label_values(&[invoice.invoice_type.as_str(), invoice.status.as_str()])
            .inc();
        Ok(invoice)
    }

    pub fn cancel(&self, invoice_id: Uuid, reason: Option<String>) -> Result<Invoice, BillingError> {
        let invoice = self
            .store
            .cancel(invoice_id, reason)
            .inspect_err(record_error)?;
        INVOICES_TOTAL
            .with_label_values(&[invoice.invoice_type.as_str(), invoice.status.as_str()])
            .inc();
        Ok(invoice)
    }
}

fn record_error(err: &BillingError) {
    warn!(error = %err, "Billing request rejected");
    ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();
}
