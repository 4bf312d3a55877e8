//! Session detection and the dashboard route guard
//!
//! The guard itself is a pure function of (session present, path). Session
//! detection is delegated to an [`AuthProvider`]; the dashboard ships with an
//! empty provider and a cookie-presence provider.

use crate::config::AuthConfig;
use anyhow::Result;
use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::COOKIE;

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// A session is attached to the request
    Session { token: String },

    /// No session (public access)
    Anonymous,
}

impl AuthContext {
    pub fn has_session(&self) -> bool {
        matches!(self, AuthContext::Session { .. })
    }
}

/// Trait for auth providers
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Extract auth context from request headers
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext>;
}

/// Provider list left empty: no request ever carries a session
pub struct NoAuthProvider;

#[async_trait]
impl AuthProvider for NoAuthProvider {
    async fn extract_context(&self, _headers: &HeaderMap) -> Result<AuthContext> {
        Ok(AuthContext::Anonymous)
    }
}

/// A session is present iff the named cookie is sent with a non-empty value
///
/// The cookie value is not verified.
#[derive(Debug, Clone)]
pub struct CookieSessionProvider {
    cookie_name: String,
}

impl CookieSessionProvider {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    fn find_cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value)
    }
}

#[async_trait]
impl AuthProvider for CookieSessionProvider {
    async fn extract_context(&self, headers: &HeaderMap) -> Result<AuthContext> {
        Ok(match self.find_cookie(headers) {
            Some(token) if !token.is_empty() => AuthContext::Session {
                token: token.to_string(),
            },
            _ => AuthContext::Anonymous,
        })
    }
}

/// Outcome of the route guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through
    Allow,
    /// Refuse; the middleware sends the client to the login page
    Deny,
    /// Send the client elsewhere
    Redirect(String),
}

/// Decide whether a request may reach `path`
///
/// The protected area is matched as a plain string prefix.
pub fn authorize(has_session: bool, path: &str, config: &AuthConfig) -> GuardDecision {
    let on_dashboard = path.starts_with(&config.protected_prefix);
    if on_dashboard {
        if has_session {
            GuardDecision::Allow
        } else {
            GuardDecision::Deny
        }
    } else if has_session {
        GuardDecision::Redirect(config.home_path.clone())
    } else {
        GuardDecision::Allow
    }
}
