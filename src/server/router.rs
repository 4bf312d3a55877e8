//! Dashboard routes and handlers

use crate::actions::{ActionOutcome, INVOICES_PATH, InvoiceActions};
use crate::core::cache::ViewCache;
use crate::core::error::{DashboardError, RequestError};
use crate::core::store::InvoiceStore;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Path of the customers listing used by the invoice forms
pub const CUSTOMERS_PATH: &str = "/dashboard/customers";

/// State shared by the dashboard handlers
#[derive(Clone)]
pub struct AppState {
    pub actions: InvoiceActions,
    pub store: Arc<dyn InvoiceStore>,
    pub cache: ViewCache,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub query: Option<String>,
}

/// Build the dashboard routes
///
/// - GET    /dashboard/invoices?query=  - Filtered invoice listing
/// - POST   /dashboard/invoices         - Create invoice (form)
/// - PUT    /dashboard/invoices/{id}    - Update invoice (form)
/// - DELETE /dashboard/invoices/{id}    - Delete invoice
/// - GET    /dashboard/customers        - Customers for the forms
pub fn build_dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route(INVOICES_PATH, get(list_invoices).post(create_invoice))
        .route(
            &format!("{}/{{id}}", INVOICES_PATH),
            put(update_invoice).delete(delete_invoice),
        )
        .route(CUSTOMERS_PATH, get(list_customers))
        .with_state(state)
}

/// Build health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-dashboard"
    }))
}

/// Fallback for paths without a route
pub async fn not_found(uri: Uri) -> DashboardError {
    RequestError::NotFound {
        path: uri.path().to_string(),
    }
    .into()
}

/// List invoices, passing `query` through to the store
///
/// GET /dashboard/invoices?query=...
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Value>, DashboardError> {
    let query = params.query.unwrap_or_default();

    if let Some(view) = state.cache.get(INVOICES_PATH, &query) {
        return Ok(Json(view));
    }

    let generation = state.cache.generation(INVOICES_PATH);
    let filter = (!query.is_empty()).then_some(query.as_str());
    let invoices = state.store.list(filter).await?;
    let view = json!({
        "query": query,
        "count": invoices.len(),
        "invoices": invoices,
    });
    state.cache.put(INVOICES_PATH, &query, view.clone(), generation);

    Ok(Json(view))
}

/// GET /dashboard/customers
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Value>, DashboardError> {
    if let Some(view) = state.cache.get(CUSTOMERS_PATH, "") {
        return Ok(Json(view));
    }

    let generation = state.cache.generation(CUSTOMERS_PATH);
    let customers = state.store.customers().await?;
    let view = json!({ "customers": customers });
    state.cache.put(CUSTOMERS_PATH, "", view.clone(), generation);

    Ok(Json(view))
}

/// Unwrap the form body, turning an extraction failure into a 400
fn form_fields(
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<HashMap<String, String>, DashboardError> {
    match form {
        Ok(Form(fields)) => Ok(fields),
        Err(rejection) => Err(RequestError::BadRequest {
            message: rejection.body_text(),
        }
        .into()),
    }
}

/// POST /dashboard/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<ActionOutcome, DashboardError> {
    let fields = form_fields(form)?;
    Ok(state.actions.create_invoice(&fields).await)
}

/// PUT /dashboard/invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<ActionOutcome, DashboardError> {
    let fields = form_fields(form)?;
    Ok(state.actions.update_invoice(&id, &fields).await)
}

/// DELETE /dashboard/invoices/{id}
pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<String>) -> ActionOutcome {
    state.actions.delete_invoice(&id).await
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect(to) => Redirect::to(&to).into_response(),
            ActionOutcome::Completed(state) => (StatusCode::OK, Json(state)).into_response(),
            ActionOutcome::Invalid(state) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
            }
            ActionOutcome::Failed(state) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
            }
        }
    }
}
