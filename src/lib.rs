//! # Invoice Dashboard
//!
//! Backend for a small invoices dashboard.
//!
//! ## Features
//!
//! - **Search URL sync**: debounced search terms written to the `query` URL parameter
//! - **Invoice actions**: validate, write, revalidate and redirect for create/update/delete
//! - **Route guard**: session-based access to `/dashboard/*`
//! - **Pluggable storage**: in-memory store, PostgreSQL behind the `postgres` feature
//! - **Configuration-Based**: YAML config with defaults and env overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let config = DashboardConfig::from_yaml_file("dashboard.yaml")?.apply_env_overrides();
//!
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_store_from_config()
//!     .await?
//!     .serve()
//!     .await?;
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod search;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{
            AuthContext, AuthProvider, CookieSessionProvider, GuardDecision, NoAuthProvider,
            authorize,
        },
        cache::{Revalidate, ViewCache},
        error::{
            ConfigError, DashboardError, RequestError, StorageError, ValidationError,
        },
        invoice::{Customer, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice},
        store::InvoiceStore,
        validation::{InvoiceInput, validate_invoice_form},
    };

    // === Actions ===
    pub use crate::actions::{ActionOutcome, FormState, INVOICES_PATH, InvoiceActions};

    // === Search ===
    pub use crate::search::{
        Debouncer, Navigator, QUERY_PARAM, SearchBox, SearchParams, initial_search_value,
        search_href,
    };

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;

    // === Config ===
    pub use crate::config::{AuthConfig, DashboardConfig, SearchConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
}
