//! In-memory invoice store.

use chrono::{Datelike, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::BillingError;
use crate::models::{CreateInvoice, Invoice, InvoiceStatus, ListInvoicesFilter};
use service_core::utils::matches_query;

#[derive(Clone)]
pub struct InvoiceStore {
    invoices: Arc<DashMap<Uuid, Invoice>>,
    sequence: Arc<AtomicU64>,
    prefix: String,
    currency: String,
}

impl InvoiceStore {
    pub fn new(prefix: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            invoices: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicU64::new(0)),
            prefix: prefix.into(),
            currency: currency.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    fn next_invoice_number(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{}-{:06}", self.prefix, Utc::now().year(), seq)
    }

    /// Persist a new invoice in `pending` status.
    #[instrument(skip(self, input), fields(patient_id = %input.patient_id))]
    pub fn create_invoice(&self, input: CreateInvoice) -> Invoice {
        let invoice = Invoice {
            invoice_id: Uuid::new_v4(),
            invoice_number: self.next_invoice_number(),
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            invoice_type: input.invoice_type,
            status: InvoiceStatus::Pending,
            currency: self.currency.clone(),
            items: input.items,
            discount: input.discount,
            discount_reason: input.discount_reason,
            scheme: input.scheme,
            payment_method: input.payment_method,
            notes: input.notes,
            totals: input.totals,
            created_utc: Utc::now(),
            paid_utc: None,
            cancelled_utc: None,
            cancellation_reason: None,
        };

        self.invoices.insert(invoice.invoice_id, invoice.clone());

        info!(
            invoice_id = %invoice.invoice_id,
            invoice_number = %invoice.invoice_number,
            final_amount = %invoice.totals.final_amount,
            "Invoice created"
        );

        invoice
    }

    pub fn get_invoice(&self, invoice_id: Uuid) -> Option<Invoice> {
        self.invoices.get(&invoice_id).map(|entry| entry.value().clone())
    }

    /// Invoices matching `filter`, newest first.
    pub fn list_invoices(&self, filter: &ListInvoicesFilter) -> Vec<Invoice> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|entry| {
                let invoice = entry.value();
                filter.patient_id.map_or(true, |id| invoice.patient_id == id)
                    && filter.status.map_or(true, |s| invoice.status == s)
                    && matches_query(
                        filter.search.as_deref(),
                        &[&invoice.invoice_number, &invoice.patient_name],
                    )
            })
            .map(|entry| entry.value().clone())
            .collect();

        invoices.sort_by(|a, b| {
            b.created_utc
                .cmp(&a.created_utc)
                .then_with(|| b.invoice_number.cmp(&a.invoice_number))
        });
        invoices.truncate(filter.limit);
        invoices
    }

    /// Settle a pending invoice.
    #[instrument(skip(self))]
    pub fn mark_paid(&self, invoice_id: Uuid) -> Result<Invoice, BillingError> {
        self.transition(invoice_id, "paid", |invoice| {
            invoice.status = InvoiceStatus::Paid;
            invoice.paid_utc = Some(Utc::now());
        })
    }

    /// Cancel a pending invoice.
    #[instrument(skip(self, reason))]
    pub fn cancel(&self, invoice_id: Uuid, reason: Option<String>) -> Result<Invoice, BillingError> {
        self.transition(invoice_id, "cancelled", |invoice| {
            invoice.status = InvoiceStatus::Cancelled;
            invoice.cancelled_utc = Some(Utc::now());
            invoice.cancellation_reason = reason;
        })
    }

    fn transition(
        &self,
        invoice_id: Uuid,
        action: &'static str,
        apply: impl FnOnce(&mut Invoice),
    ) -> Result<Invoice, BillingError> {
        let mut entry = self
            .invoices
            .get_mut(&invoice_id)
            .ok_or(BillingError::InvoiceNotFound(invoice_id))?;
        let invoice = entry.value_mut();

        if invoice.status != InvoiceStatus::Pending {
            return Err(BillingError::InvalidTransition {
                invoice_number: invoice.invoice_number.clone(),
                status: invoice.status.as_str(),
                action,
            });
        }

        apply(&mut *invoice);
        info!(
            invoice_id = %invoice_id,
            status = invoice.status.as_str(),
            "Invoice status updated"
        );

        Ok(invoice.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceType, PaymentMethod};
    use crate::services::InvoiceCalculator;

    fn draft(patient_id: Uuid, patient_name: &str) -> CreateInvoice {
        CreateInvoice {
            patient_id,
            patient_name: patient_name.to_string(),
            invoice_type: InvoiceType::Opd,
            items: vec![],
            discount: None,
            discount_reason: None,
            scheme: None,
            payment_method: PaymentMethod::Cash,
            notes: None,
            totals: InvoiceCalculator::default().calculate(&[], None, None),
        }
    }

    #[test]
    fn invoice_numbers_are_sequential() {
        let store = InvoiceStore::new("INV", "INR");
        let first = store.create_invoice(draft(Uuid::new_v4(), "A"));
        let second = store.create_invoice(draft(Uuid::new_v4(), "B"));

        assert!(first.invoice_number.starts_with("INV-"));
        assert!(first.invoice_number.ends_with("-000001"));
        assert!(second.invoice_number.ends_with("-000002"));
        assert_eq!(first.status, InvoiceStatus::Pending);
        assert_eq!(first.currency, "INR");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn list_filters_by_patient_and_search() {
        let store = InvoiceStore::new("INV", "INR");
        let patient = Uuid::new_v4();
        store.create_invoice(draft(patient, "Ravi Kumar"));
        store.create_invoice(draft(patient, "Ravi Kumar"));
        store.create_invoice(draft(Uuid::new_v4(), "Priya Sharma"));

        let filter = ListInvoicesFilter {
            patient_id: Some(patient),
            limit: 20,
            ..Default::default()
        };
        assert_eq!(store.list_invoices(&filter).len(), 2);

        let filter = ListInvoicesFilter {
            search: Some("priya".to_string()),
            limit: 20,
            ..Default::default()
        };
        let found = store.list_invoices(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].patient_name, "Priya Sharma");
    }

    #[test]
    fn list_is_newest_first_and_limited() {
        let store = InvoiceStore::new("INV", "INR");
        for _ in 0..5 {
            store.create_invoice(draft(Uuid::new_v4(), "Same"));
        }

        let filter = ListInvoicesFilter {
            limit: 3,
            ..Default::default()
        };
        let listed = store.list_invoices(&filter);
        assert_eq!(listed.len(), 3);
        assert!(listed[0].invoice_number.ends_with("-000005"));
    }

    #[test]
    fn only_pending_invoices_transition() {
        let store = InvoiceStore::new("INV", "INR");
        let invoice = store.create_invoice(draft(Uuid::new_v4(), "A"));

        let paid = store.mark_paid(invoice.invoice_id).expect("pending invoice pays");
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(paid.paid_utc.is_some());

        let err = store
            .cancel(invoice.invoice_id, None)
            .expect_err("paid invoice cannot be cancelled");
        assert!(matches!(
            err,
            BillingError::InvalidTransition {
                status: "paid",
                action: "cancelled",
                ..
            }
        ));
    }

    #[test]
    fn cancel_records_reason() {
        let store = InvoiceStore::new("INV", "INR");
        let invoice = store.create_invoice(draft(Uuid::new_v4(), "A"));

        let cancelled = store
            .cancel(invoice.invoice_id, Some("Duplicate bill".to_string()))
            .expect("pending invoice cancels");
        assert_eq!(cancelled.status, InvoiceStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Duplicate bill"));
    }

    #[test]
    fn unknown_invoice_is_not_found() {
        let store = InvoiceStore::new("INV", "INR");
        let id = Uuid::new_v4();
        assert!(matches!(
            store.mark_paid(id),
            Err(BillingError::InvoiceNotFound(missing)) if missing == id
        ));
    }
}
