//! Invoice mutation actions
//!
//! Each action runs validate → write → revalidate → navigate and always
//! returns an [`ActionOutcome`]; no error escapes to the caller. A redirect
//! after a successful write is an outcome variant, not an error.

use crate::core::cache::Revalidate;
use crate::core::error::ValidationError;
use crate::core::invoice::{InvoiceChanges, NewInvoice};
use crate::core::store::InvoiceStore;
use crate::core::validation::validate_invoice_form;
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Path of the invoices listing: revalidated after every write and the
/// navigation target after create and update
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// State handed back to the form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    /// Messages for each failing field
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub errors: IndexMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    fn message(message: impl Into<String>) -> Self {
        Self {
            errors: IndexMap::new(),
            message: Some(message.into()),
        }
    }
}

/// Result of running an action
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Write succeeded; navigate to the given path
    Redirect(String),
    /// Write succeeded; stay on the current page
    Completed(FormState),
    /// Input failed validation; nothing was written
    Invalid(FormState),
    /// The store rejected the write
    Failed(FormState),
}

impl ActionOutcome {
    pub fn form_state(&self) -> Option<&FormState> {
        match self {
            ActionOutcome::Redirect(_) => None,
            ActionOutcome::Completed(state)
            | ActionOutcome::Invalid(state)
            | ActionOutcome::Failed(state) => Some(state),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }

    fn invalid(self, errors: IndexMap<String, Vec<String>>) -> ActionOutcome {
        ActionOutcome::Invalid(FormState {
            errors,
            message: Some(format!("Missing Fields. Failed to {} Invoice.", self.verb())),
        })
    }

    fn failed(self) -> ActionOutcome {
        ActionOutcome::Failed(FormState::message(format!(
            "Database Error: Failed to {} Invoice.",
            self.verb()
        )))
    }
}

/// Source of the creation date
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Today's date in UTC
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The create / update / delete invoice actions
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    revalidator: Arc<dyn Revalidate>,
    clock: Clock,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, revalidator: Arc<dyn Revalidate>) -> Self {
        Self {
            store,
            revalidator,
            clock: Arc::new(utc_today),
        }
    }

    /// Replace the clock used to date new invoices
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// Create an invoice from raw form fields
    pub async fn create_invoice(&self, fields: &HashMap<String, String>) -> ActionOutcome {
        let op = Operation::Create;
        let input = match validate_invoice_form(fields) {
            Ok(input) => input,
            Err(e) => return reject(op, e),
        };

        let invoice = NewInvoice {
            amount: input.amount_cents,
            customer_id: input.customer_id,
            status: input.status,
            date: (self.clock)(),
        };

        match self.store.insert(invoice).await {
            Ok(id) => {
                tracing::info!(invoice_id = %id, "invoice created");
                self.revalidator.revalidate_path(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH.to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create invoice");
                op.failed()
            }
        }
    }

    /// Overwrite customer, amount and status of invoice `id`
    ///
    /// A missing row is not detected: the write affects nothing and the
    /// action still redirects.
    pub async fn update_invoice(&self, id: &str, fields: &HashMap<String, String>) -> ActionOutcome {
        let op = Operation::Update;
        let input = match validate_invoice_form(fields) {
            Ok(input) => input,
            Err(e) => return reject(op, e),
        };

        let changes = InvoiceChanges {
            amount: input.amount_cents,
            customer_id: input.customer_id,
            status: input.status,
        };

        match self.store.update(id, changes).await {
            Ok(rows) => {
                tracing::info!(invoice_id = %id, rows, "invoice updated");
                self.revalidator.revalidate_path(INVOICES_PATH);
                ActionOutcome::Redirect(INVOICES_PATH.to_string())
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to update invoice");
                op.failed()
            }
        }
    }

    /// Delete invoice `id`; does not navigate
    pub async fn delete_invoice(&self, id: &str) -> ActionOutcome {
        let op = Operation::Delete;
        match self.store.delete(id).await {
            Ok(rows) => {
                tracing::info!(invoice_id = %id, rows, "invoice deleted");
                self.revalidator.revalidate_path(INVOICES_PATH);
                ActionOutcome::Completed(FormState::message("Deleted Invoice."))
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, error = %e, "failed to delete invoice");
                op.failed()
            }
        }
    }
}

fn reject(op: Operation, error: ValidationError) -> ActionOutcome {
    tracing::debug!(operation = op.verb(), %error, "invoice form rejected");
    let ValidationError::FieldErrors(errors) = error;
    op.invalid(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cache::ViewCache;
    use crate::storage::InMemoryInvoiceStore;

    fn actions() -> (InvoiceActions, InMemoryInvoiceStore) {
        let store = InMemoryInvoiceStore::new();
        let actions = InvoiceActions::new(Arc::new(store.clone()), Arc::new(ViewCache::new()))
            .with_clock(|| NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        (actions, store)
    }

    #[tokio::test]
    async fn test_create_dates_with_clock() {
        let (actions, store) = actions();
        let fields = HashMap::from([
            ("customerId".to_string(), "c1".to_string()),
            ("amount".to_string(), "3".to_string()),
            ("status".to_string(), "paid".to_string()),
        ]);

        let outcome = actions.create_invoice(&fields).await;

        assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH.to_string()));
        let rows = store.list(None).await.unwrap();
        assert_eq!(rows[0].iso_date(), "2024-01-02");
        assert_eq!(rows[0].amount, 300);
    }

    #[tokio::test]
    async fn test_update_rejection_uses_update_message() {
        let (actions, _) = actions();
        let outcome = actions.update_invoice("x", &HashMap::new()).await;

        let state = outcome.form_state().unwrap();
        assert_eq!(
            state.message.as_deref(),
            Some("Missing Fields. Failed to Update Invoice.")
        );
        assert!(matches!(outcome, ActionOutcome::Invalid(_)));
    }

    #[test]
    fn test_form_state_serialization_skips_empty_errors() {
        let json = serde_json::to_value(FormState::message("Deleted Invoice.")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Deleted Invoice." }));
    }
}
