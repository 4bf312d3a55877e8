//! Search box to URL synchronization
//!
//! The URL is the only state: the box reads its initial value from the
//! `query` parameter, and each settled search term is written back to it.
//! [`search_href`] is the pure transformation; [`SearchBox`] adds the
//! debounce and hands the result to a [`Navigator`].

pub mod debounce;
pub mod params;

pub use debounce::Debouncer;
pub use params::SearchParams;

use crate::config::SearchConfig;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Name of the search query parameter
pub const QUERY_PARAM: &str = "query";

/// Quiet interval used when none is configured
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(750);

/// Build the href for `pathname` after searching for `term`
///
/// A non-empty term is stored verbatim in `query`; an empty term removes
/// the parameter. Other parameters are kept in order.
pub fn search_href(pathname: &str, params: &SearchParams, term: &str) -> String {
    let mut params = params.clone();
    apply_term(&mut params, term);
    href(pathname, &params)
}

/// Value the search box shows when it is first rendered
pub fn initial_search_value(params: &SearchParams) -> String {
    params.get(QUERY_PARAM).unwrap_or_default().to_string()
}

fn apply_term(params: &mut SearchParams, term: &str) {
    if term.is_empty() {
        params.delete(QUERY_PARAM);
    } else {
        params.set(QUERY_PARAM, term);
    }
}

fn href(pathname: &str, params: &SearchParams) -> String {
    if params.is_empty() {
        pathname.to_string()
    } else {
        format!("{}?{}", pathname, params)
    }
}

/// Performs the history update for the search box
pub trait Navigator: Send + Sync {
    /// Replace the current history entry with `href`
    fn replace(&self, href: &str);
}

impl<F: Fn(&str) + Send + Sync> Navigator for F {
    fn replace(&self, href: &str) {
        self(href)
    }
}

#[derive(Debug, Clone)]
struct Location {
    pathname: String,
    params: SearchParams,
}

/// A search input bound to the current location
pub struct SearchBox {
    location: Arc<Mutex<Location>>,
    initial_value: String,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    pub fn new(
        pathname: impl Into<String>,
        params: SearchParams,
        quiet: Duration,
        navigator: impl Navigator + 'static,
    ) -> Self {
        let initial_value = initial_search_value(&params);
        let location = Arc::new(Mutex::new(Location {
            pathname: pathname.into(),
            params,
        }));

        let sink_location = Arc::clone(&location);
        let debouncer = Debouncer::new(quiet, move |term: String| {
            let next = {
                let mut location = sink_location.lock().unwrap_or_else(|e| e.into_inner());
                apply_term(&mut location.params, &term);
                href(&location.pathname, &location.params)
            };
            tracing::debug!(href = %next, "search term settled");
            navigator.replace(&next);
        });

        Self {
            location,
            initial_value,
            debouncer,
        }
    }

    /// Build a search box with the configured quiet interval
    pub fn from_config(
        config: &SearchConfig,
        pathname: impl Into<String>,
        params: SearchParams,
        navigator: impl Navigator + 'static,
    ) -> Self {
        Self::new(pathname, params, config.debounce(), navigator)
    }

    /// Value shown in the input, read once from the URL
    pub fn value(&self) -> &str {
        &self.initial_value
    }

    /// Handle a change event from the input
    pub fn on_change(&self, term: impl Into<String>) {
        self.debouncer.call(term.into());
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn location(&self) -> MutexGuard<'_, Location> {
        self.location.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current href as last written by this box
    pub fn current_href(&self) -> String {
        let location = self.location();
        href(&location.pathname, &location.params)
    }
}
