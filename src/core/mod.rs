//! Core types and traits: invoices, validation, storage seam, auth and caching

pub mod auth;
pub mod cache;
pub mod error;
pub mod invoice;
pub mod store;
pub mod validation;

pub use auth::{AuthContext, AuthProvider, CookieSessionProvider, GuardDecision, NoAuthProvider};
pub use cache::{Revalidate, ViewCache};
pub use error::{ConfigError, DashboardError, RequestError, StorageError, ValidationError};
pub use invoice::{Customer, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use store::InvoiceStore;
pub use validation::{InvoiceInput, validate_invoice_form};
