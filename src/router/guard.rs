//! Pre-navigation policy check.
//!
//! Reads the session only; never calls the network.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::{Access, Route};
use super::{ADMIN_PATH, LOGIN_PATH, NOT_FOUND_PATH};
use crate::net::types::Role;
use crate::state::session::SessionHandle;

/// Verdict for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

#[derive(Debug, Clone)]
pub struct NavigationGuard {
    session: SessionHandle,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn check(&self, route: &Route) -> Navigation {
        let session = self.session.snapshot();
        let logged_in = session.logged_in();

        if route.admin_landing && logged_in && session.role() == Some(Role::Admin) {
            return Navigation::Redirect(ADMIN_PATH);
        }

        match route.access {
            Access::Public => Navigation::Proceed,
            Access::Authenticated if !logged_in => Navigation::Redirect(LOGIN_PATH),
            Access::Authenticated => Navigation::Proceed,
            Access::Role(_) if !logged_in => Navigation::Redirect(LOGIN_PATH),
            Access::Role(required) if session.role() == Some(required) => Navigation::Proceed,
            Access::Role(required) => {
                tracing::debug!(route = route.name, required = %required, "role lacks privilege");
                Navigation::Redirect(NOT_FOUND_PATH)
            }
        }
    }
}
