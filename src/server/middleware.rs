//! Route guard middleware

use crate::config::AuthConfig;
use crate::core::auth::{AuthContext, AuthProvider, GuardDecision, authorize};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use url::form_urlencoded;

/// State for [`route_guard`]
#[derive(Clone)]
pub struct GuardState {
    pub provider: Arc<dyn AuthProvider>,
    pub config: Arc<AuthConfig>,
}

/// Consult the route guard before letting a request through
///
/// Denied requests are sent to the login page with the original path and
/// query as `callbackUrl`.
pub async fn route_guard(State(guard): State<GuardState>, request: Request, next: Next) -> Response {
    let context = match guard.provider.extract_context(request.headers()).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed, treating request as anonymous");
            AuthContext::Anonymous
        }
    };

    let path = request.uri().path();
    match authorize(context.has_session(), path, &guard.config) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Deny => {
            let callback = request
                .uri()
                .path_and_query()
                .map_or(path, |pq| pq.as_str());
            tracing::debug!(path, "no session, redirecting to login");
            Redirect::to(&login_redirect(&guard.config.login_path, callback)).into_response()
        }
        GuardDecision::Redirect(target) => {
            tracing::debug!(path, target = %target, "session present, redirecting");
            Redirect::to(&target).into_response()
        }
    }
}

/// `login_path?callbackUrl=<callback>`
pub fn login_redirect(login_path: &str, callback: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("callbackUrl", callback)
        .finish();
    format!("{}?{}", login_path, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::CookieSessionProvider;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use axum::routing::get;
    use tower::ServiceExt;

    fn guarded_app() -> Router {
        let guard = GuardState {
            provider: Arc::new(CookieSessionProvider::new("session")),
            config: Arc::new(AuthConfig::default()),
        };
        Router::new()
            .route("/dashboard/invoices", get(|| async { "invoices" }))
            .route("/about", get(|| async { "about" }))
            .layer(axum::middleware::from_fn_with_state(guard, route_guard))
    }

    async fn send(uri: &str, cookie: Option<&str>) -> Response {
        let mut request = axum::http::Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        guarded_app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_denied_request_keeps_query_in_callback() {
        let response = send("/dashboard/invoices?query=lee", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/login?callbackUrl=%2Fdashboard%2Finvoices%3Fquery%3Dlee"
        );
    }

    #[tokio::test]
    async fn test_session_reaches_protected_handler() {
        let response = send("/dashboard/invoices", Some("theme=dark; session=abc")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_outside_protected_area_goes_home() {
        let response = send("/about", Some("session=abc")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn test_anonymous_public_path_passes() {
        let response = send("/about", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_login_redirect_encodes_callback() {
        assert_eq!(
            login_redirect("/login", "/dashboard/invoices?query=a b"),
            "/login?callbackUrl=%2Fdashboard%2Finvoices%3Fquery%3Da+b"
        );
    }
}
