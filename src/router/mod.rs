//! Guarded navigation.
//!
//! ARCHITECTURE
//! ============
//! [`routes`] owns the table, [`guard`] the access policy, and [`Router`]
//! ties them together: resolve a path, apply static redirects and guard
//! verdicts until a route is actually entered, then run its load callback.
//! A view's load logic never runs for a route that redirected away.
//!
//! [`Navigator`] is the outbound port used when something outside the router
//! (a 401 from the HTTP client) has to force a location change.

pub mod guard;
pub mod routes;


use guard::{Navigation, NavigationGuard};
use routes::RouteMatch;

use crate::state::session::SessionHandle;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/account/login";
pub const NOT_FOUND_PATH: &str = "/404";
pub const ADMIN_PATH: &str = "/admin";

/// Upper bound on redirects followed for one navigation.
pub const MAX_REDIRECTS: usize = 8;

/// Forces the current location to change.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that only records the forced location in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigating");
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("redirect loop starting at {path} ({hops} hops)")]
    RedirectLoop { path: String, hops: usize },
}

/// Result of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entered<T> {
    pub route: RouteMatch,
    /// The path originally asked for, when it differs from where we landed.
    pub redirected_from: Option<String>,
    pub view: T,
}

#[derive(Debug, Clone)]
pub struct Router {
    guard: NavigationGuard,
}

impl Router {
    #[must_use]
    pub fn new(session: SessionHandle) -> Self {
        Self { guard: NavigationGuard::new(session) }
    }

    /// Follow redirects from `path` until the guard lets a route through.
    ///
    /// # Errors
    ///
    /// [`RouterError::RedirectLoop`] after [`MAX_REDIRECTS`] hops.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, RouterError> {
        let mut current = routes::resolve(path);
        for _ in 0..=MAX_REDIRECTS {
            let next = match current.route.redirect {
                Some(target) => Some(target),
                None => match self.guard.check(current.route) {
                    Navigation::Proceed => None,
                    Navigation::Redirect(target) => Some(target),
                },
            };
            match next {
                None => return Ok(current),
                Some(target) => {
                    tracing::debug!(from = %current.path, to = target, "redirect");
                    current = routes::resolve(target);
                }
            }
        }
        Err(RouterError::RedirectLoop { path: path.to_owned(), hops: MAX_REDIRECTS })
    }

    /// Navigate to `path` and run `load` for the route finally entered.
    ///
    /// # Errors
    ///
    /// See [`Router::resolve`].
    pub fn enter<T>(&self, path: &str, load: impl FnOnce(&RouteMatch) -> T) -> Result<Entered<T>, RouterError> {
        let route = self.resolve(path)?;
        let requested = routes::normalize_path(path);
        let redirected_from = (requested != route.path).then_some(requested);
        let view = load(&route);
        Ok(Entered { route, redirected_from, view })
    }
}
