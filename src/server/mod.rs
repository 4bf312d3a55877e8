//! HTTP server for the dashboard
//!
//! This module provides a `ServerBuilder` that wires:
//! - the invoice listing and mutation routes
//! - the route guard middleware
//! - health check routes

pub mod builder;
pub mod middleware;
pub mod router;

pub use builder::ServerBuilder;
pub use middleware::{GuardState, login_redirect, route_guard};
pub use router::{AppState, CUSTOMERS_PATH, build_dashboard_routes, health_routes};
