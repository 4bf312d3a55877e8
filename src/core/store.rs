//! Storage seam for invoices

use crate::core::error::StorageError;
use crate::core::invoice::{Customer, Invoice, InvoiceChanges, NewInvoice};
use async_trait::async_trait;

/// Store trait for invoice rows
///
/// Every write method maps to exactly one parameterized statement. Writes
/// report the number of affected rows; a row count of zero is not an error.
/// The dashboard is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert one row and return its generated id
    async fn insert(&self, invoice: NewInvoice) -> Result<String, StorageError>;

    /// Overwrite customer, amount and status of the row with `id`
    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64, StorageError>;

    /// Remove the row with `id`
    async fn delete(&self, id: &str) -> Result<u64, StorageError>;

    /// List invoices, newest first, optionally filtered by a search query
    async fn list(&self, query: Option<&str>) -> Result<Vec<Invoice>, StorageError>;

    /// List customers by name
    async fn customers(&self) -> Result<Vec<Customer>, StorageError>;
}
