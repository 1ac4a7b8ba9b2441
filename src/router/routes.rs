//! Route table and path matching.
//!
//! Each route carries the access policy the guard enforces. Patterns use
//! `:name` for a single dynamic segment; the final `*` entry matches anything.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::types::Role;

use super::{ADMIN_PATH, HOME_PATH, LOGIN_PATH, NOT_FOUND_PATH};

const CATCH_ALL: &str = "*";

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub pattern: &'static str,
    pub access: Access,
    /// Static redirect applied before any guard check.
    pub redirect: Option<&'static str>,
    /// Authenticated admins visiting this route are sent to the admin area.
    pub admin_landing: bool,
}

impl Route {
    const fn new(name: &'static str, pattern: &'static str, access: Access) -> Self {
        Self { name, pattern, access, redirect: None, admin_landing: false }
    }

    const fn redirect(name: &'static str, pattern: &'static str, target: &'static str) -> Self {
        Self { name, pattern, access: Access::Public, redirect: Some(target), admin_landing: false }
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        !matches!(self.access, Access::Public)
    }
}

pub static ROUTES: &[Route] = &[
    Route { admin_landing: true, ..Route::new("home", HOME_PATH, Access::Public) },
    Route::redirect("account", "/account", LOGIN_PATH),
    Route::new("login", LOGIN_PATH, Access::Public),
    Route::new("register", "/account/register", Access::Public),
    Route::new("courses", "/courses", Access::Public),
    Route::new("courseDetail", "/course/:id", Access::Public),
    Route::new("teacher", "/teacher", Access::Role(Role::Teacher)),
    Route::new("courseCreate", "/teacher/courses/create", Access::Role(Role::Teacher)),
    Route::new("courseEdit", "/teacher/courses/:id/edit", Access::Role(Role::Teacher)),
    Route::new("courseOutline", "/teacher/courses/:id/outline", Access::Role(Role::Teacher)),
    Route::new("profile", "/profile", Access::Authenticated),
    Route::new("recharge", "/recharge", Access::Authenticated),
    Route::new("myCourses", "/my-courses", Access::Authenticated),
    Route::new("myFavorites", "/my-favorites", Access::Authenticated),
    Route::new("cart", "/cart", Access::Authenticated),
    Route::new("orders", "/orders", Access::Authenticated),
    Route::new("orderDetail", "/order/:orderNo", Access::Authenticated),
    Route::new("learning", "/learning/:courseId", Access::Authenticated),
    Route::new("admin", ADMIN_PATH, Access::Role(Role::Admin)),
    Route::new("notFound", NOT_FOUND_PATH, Access::Public),
    CATCH_ALL_ROUTE,
];

const CATCH_ALL_ROUTE: Route = Route::redirect("catchAll", CATCH_ALL, NOT_FOUND_PATH);
static FALLBACK: Route = CATCH_ALL_ROUTE;

/// A route resolved against a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    /// Normalized path (no query, fragment, or trailing slash).
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Strip query string, fragment, and trailing slash; ensure a leading slash.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim().trim_end_matches('/');
    if trimmed.is_empty() {
        HOME_PATH.to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    if pattern == CATCH_ALL {
        return Some(Vec::new());
    }
    let mut want = pattern.split('/');
    let mut have = path.split('/');
    let mut params = Vec::new();
    loop {
        match (want.next(), have.next()) {
            (None, None) => return Some(params),
            (Some(w), Some(h)) => {
                if let Some(name) = w.strip_prefix(':') {
                    if h.is_empty() {
                        return None;
                    }
                    params.push((name.to_owned(), h.to_owned()));
                } else if w != h {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Find the first route matching `path`. The catch-all guarantees a match.
#[must_use]
pub fn resolve(path: &str) -> RouteMatch {
    let path = normalize_path(path);
    let found = ROUTES
        .iter()
        .find_map(|route| match_pattern(route.pattern, &path).map(|params| (route, params)));
    match found {
        Some((route, params)) => RouteMatch { route, path, params },
        None => RouteMatch { route: &FALLBACK, path, params: Vec::new() },
    }
}
