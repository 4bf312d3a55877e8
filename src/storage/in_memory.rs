//! In-memory implementation of InvoiceStore for testing and development

use crate::core::error::StorageError;
use crate::core::invoice::{Customer, Invoice, InvoiceChanges, NewInvoice};
use crate::core::store::InvoiceStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

#[derive(Default)]
struct Tables {
    invoices: HashMap<String, Invoice>,
    customers: HashMap<String, Customer>,
}

/// In-memory invoice store
///
/// Uses RwLock for thread-safe access. Referential integrity of
/// `customer_id` is only checked when enabled with
/// [`enforce_customer_references`](Self::enforce_customer_references).
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    tables: Arc<RwLock<Tables>>,
    enforce_references: bool,
}

impl InMemoryInvoiceStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose customer id is not a known customer
    pub fn enforce_customer_references(mut self) -> Self {
        self.enforce_references = true;
        self
    }

    /// Seed a customer row
    pub fn with_customer(self, customer: Customer) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.customers.insert(customer.id.clone(), customer);
        }
        self
    }

    /// Seed an invoice row as-is
    pub fn with_invoice(self, invoice: Invoice) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.invoices.insert(invoice.id.clone(), invoice);
        }
        self
    }

    /// Fetch one invoice by id
    pub fn get(&self, id: &str) -> Result<Option<Invoice>, StorageError> {
        Ok(self.read()?.invoices.get(id).cloned())
    }

    /// Number of invoice rows
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.invoices.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|e| StorageError::QueryError {
            backend: BACKEND.to_string(),
            message: format!("Failed to acquire read lock: {}", e),
        })
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|e| StorageError::QueryError {
            backend: BACKEND.to_string(),
            message: format!("Failed to acquire write lock: {}", e),
        })
    }

    fn check_customer(&self, tables: &Tables, customer_id: &str) -> Result<(), StorageError> {
        if self.enforce_references && !tables.customers.contains_key(customer_id) {
            return Err(StorageError::IntegrityError {
                message: format!(
                    "invoices.customer_id '{}' does not reference a customer",
                    customer_id
                ),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<String, StorageError> {
        let mut tables = self.write()?;
        self.check_customer(&tables, &invoice.customer_id)?;

        let id = Uuid::new_v4().to_string();
        tables.invoices.insert(
            id.clone(),
            Invoice {
                id: id.clone(),
                customer_id: invoice.customer_id,
                amount: invoice.amount,
                status: invoice.status,
                date: invoice.date,
            },
        );

        Ok(id)
    }

    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        self.check_customer(&tables, &changes.customer_id)?;

        let Some(row) = tables.invoices.get_mut(id) else {
            return Ok(0);
        };
        row.customer_id = changes.customer_id;
        row.amount = changes.amount;
        row.status = changes.status;

        Ok(1)
    }

    async fn delete(&self, id: &str) -> Result<u64, StorageError> {
        let mut tables = self.write()?;
        Ok(u64::from(tables.invoices.remove(id).is_some()))
    }

    async fn list(&self, query: Option<&str>) -> Result<Vec<Invoice>, StorageError> {
        let tables = self.read()?;
        let mut invoices: Vec<Invoice> = tables
            .invoices
            .values()
            .filter(|invoice| query.is_none_or(|q| invoice.matches(q)))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(invoices)
    }

    async fn customers(&self) -> Result<Vec<Customer>, StorageError> {
        let tables = self.read()?;
        let mut customers: Vec<Customer> = tables.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::InvoiceStatus;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn new_invoice(customer_id: &str, amount: i64, date: NaiveDate) -> NewInvoice {
        NewInvoice {
            customer_id: customer_id.to_string(),
            amount,
            status: InvoiceStatus::Pending,
            date,
        }
    }

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id),
            image_url: format!("/customers/{}.png", id),
        }
    }

    #[tokio::test]
    async fn test_insert_generates_id() {
        let store = InMemoryInvoiceStore::new();
        let id = store.insert(new_invoice("c1", 1250, day(1))).await.unwrap();

        let row = store.get(&id).unwrap().unwrap();
        assert_eq!(row.customer_id, "c1");
        assert_eq!(row.amount, 1250);
        assert_eq!(row.date, day(1));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_date() {
        let store = InMemoryInvoiceStore::new();
        let id = store.insert(new_invoice("c1", 100, day(1))).await.unwrap();

        let affected = store
            .update(
                &id,
                InvoiceChanges {
                    customer_id: "c2".to_string(),
                    amount: 200,
                    status: InvoiceStatus::Paid,
                },
            )
            .await
            .unwrap();

        assert_eq!(affected, 1);
        let row = store.get(&id).unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.date, day(1));
        assert_eq!(row.customer_id, "c2");
        assert_eq!(row.status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn test_update_missing_row_affects_nothing() {
        let store = InMemoryInvoiceStore::new();
        let affected = store
            .update(
                "missing",
                InvoiceChanges {
                    customer_id: "c1".to_string(),
                    amount: 1,
                    status: InvoiceStatus::Paid,
                },
            )
            .await
            .unwrap();
        assert_eq!(affected, 0);
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_at_most_one_row() {
        let store = InMemoryInvoiceStore::new();
        let id = store.insert(new_invoice("c1", 100, day(1))).await.unwrap();
        store.insert(new_invoice("c1", 200, day(2))).await.unwrap();

        assert_eq!(store.delete(&id).await.unwrap(), 1);
        assert_eq!(store.delete(&id).await.unwrap(), 0);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = InMemoryInvoiceStore::new();
        store.insert(new_invoice("alpha", 100, day(1))).await.unwrap();
        store.insert(new_invoice("beta", 200, day(3))).await.unwrap();
        store.insert(new_invoice("alphabet", 300, day(2))).await.unwrap();

        let all = store.list(None).await.unwrap();
        let dates: Vec<NaiveDate> = all.iter().map(|i| i.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);

        let filtered = store.list(Some("ALPHA")).await.unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|i| i.customer_id.starts_with("alpha")));
    }

    #[tokio::test]
    async fn test_list_wildcard_characters_match_literally() {
        let store = InMemoryInvoiceStore::new();
        store.insert(new_invoice("delba", 100, day(1))).await.unwrap();
        store.insert(new_invoice("50%_off", 200, day(2))).await.unwrap();

        assert_eq!(store.list(Some("%")).await.unwrap().len(), 1);
        assert_eq!(store.list(Some("_")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dangling_customer_accepted_without_enforcement() {
        let store = InMemoryInvoiceStore::new();
        assert!(store.insert(new_invoice("ghost", 100, day(1))).await.is_ok());
    }

    #[tokio::test]
    async fn test_dangling_customer_rejected_with_enforcement() {
        let store = InMemoryInvoiceStore::new()
            .enforce_customer_references()
            .with_customer(customer("c1", "Delba"));

        assert!(store.insert(new_invoice("c1", 100, day(1))).await.is_ok());
        let err = store
            .insert(new_invoice("ghost", 100, day(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
    }

    #[tokio::test]
    async fn test_customers_sorted_by_name() {
        let store = InMemoryInvoiceStore::new()
            .with_customer(customer("c2", "Lee"))
            .with_customer(customer("c1", "Amy"));

        let names: Vec<String> = store
            .customers()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Amy", "Lee"]);
    }
}
