//! ServerBuilder for fluent API to build the dashboard HTTP server

use super::middleware::{GuardState, route_guard};
use super::router::{AppState, build_dashboard_routes, health_routes, not_found};
use crate::actions::InvoiceActions;
use crate::config::DashboardConfig;
use crate::core::auth::{AuthProvider, CookieSessionProvider};
use crate::core::cache::ViewCache;
use crate::core::store::InvoiceStore;
use crate::storage::InMemoryInvoiceStore;
use anyhow::Result;
use axum::Router;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the dashboard router
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_store(InMemoryInvoiceStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: DashboardConfig,
    store: Option<Arc<dyn InvoiceStore>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    cache: ViewCache,
    clock: Option<Arc<dyn Fn() -> NaiveDate + Send + Sync>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: DashboardConfig::default(),
            store: None,
            auth_provider: None,
            cache: ViewCache::new(),
            clock: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the invoice store
    pub fn with_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Pick the store from `database.url`
    ///
    /// Without a URL the in-memory store is used. A URL requires the
    /// `postgres` feature.
    pub async fn with_store_from_config(mut self) -> Result<Self> {
        match self.config.database.url.clone() {
            None => {
                tracing::info!("No database.url configured, using in-memory store");
                self.store = Some(Arc::new(InMemoryInvoiceStore::new()));
            }
            #[cfg(feature = "postgres")]
            Some(url) => {
                let store = crate::storage::PostgresInvoiceStore::connect(&url).await?;
                tracing::info!("Connected to PostgreSQL");
                self.store = Some(Arc::new(store));
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                anyhow::bail!("database.url is set but the `postgres` feature is not enabled");
            }
        }
        Ok(self)
    }

    /// Set the auth provider
    ///
    /// Defaults to a [`CookieSessionProvider`] on `auth.session_cookie`.
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Share a view cache with the caller
    pub fn with_cache(mut self, cache: ViewCache) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the clock used to date new invoices
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Add custom routes behind the route guard
    ///
    /// Use this for pages that are not part of the invoice CRUD, such as the
    /// login page.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    ///
    /// Health routes are served without the guard; everything else,
    /// including the 404 fallback, goes through it.
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("InvoiceStore is required. Call .with_store()"))?;

        let provider = self.auth_provider.unwrap_or_else(|| {
            Arc::new(CookieSessionProvider::new(
                self.config.auth.session_cookie.clone(),
            ))
        });

        let mut actions = InvoiceActions::new(store.clone(), Arc::new(self.cache.clone()));
        if let Some(clock) = self.clock {
            actions = actions.with_clock(move || clock());
        }

        let state = AppState {
            actions,
            store,
            cache: self.cache,
        };
        let guard = GuardState {
            provider,
            config: Arc::new(self.config.auth),
        };

        let mut guarded = build_dashboard_routes(state);
        for custom_router in self.custom_routes {
            guarded = guarded.merge(custom_router);
        }
        let guarded = guarded
            .fallback(not_found)
            .layer(axum::middleware::from_fn_with_state(guard, route_guard));

        Ok(health_routes()
            .merge(guarded)
            .layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.bind` and handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_store_fails() {
        let result = ServerBuilder::new().build();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("InvoiceStore is required")
        );
    }

    #[test]
    fn test_build_with_store() {
        let result = ServerBuilder::new()
            .with_store(InMemoryInvoiceStore::new())
            .build();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_store_from_config_defaults_to_memory() {
        let builder = ServerBuilder::new().with_store_from_config().await.unwrap();
        assert!(builder.store.is_some());
    }
}
