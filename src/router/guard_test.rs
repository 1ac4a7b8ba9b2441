use super::*;
use crate::router::routes::resolve;
use crate::test_helpers::profile;
use crate::state::session::TOKEN_KEY;
use crate::util::persistence::{KeyValueStore, MemoryStore};
use std::sync::Arc;

fn guard_for(session: Option<(&str, &str)>) -> NavigationGuard {
    let handle = SessionHandle::new(Arc::new(MemoryStore::new()));
    if let Some((token, role)) = session {
        handle.establish(token.to_owned(), profile(1, role));
    }
    NavigationGuard::new(handle)
}

#[test]
fn public_routes_always_proceed() {
    let guard = guard_for(None);
    for path in ["/courses", "/course/3", "/account/login", "/404"] {
        assert_eq!(guard.check(resolve(path).route), Navigation::Proceed, "{path}");
    }
}

#[test]
fn protected_route_without_session_redirects_to_login() {
    let guard = guard_for(None);
    for path in ["/cart", "/orders", "/profile", "/teacher", "/admin"] {
        assert_eq!(guard.check(resolve(path).route), Navigation::Redirect(LOGIN_PATH), "{path}");
    }
}

#[test]
fn credential_without_profile_is_not_logged_in() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(TOKEN_KEY, "T").unwrap();
    let guard = NavigationGuard::new(SessionHandle::new(storage));
    assert_eq!(guard.check(resolve("/cart").route), Navigation::Redirect(LOGIN_PATH));
}

#[test]
fn authenticated_route_proceeds_for_any_role() {
    let guard = guard_for(Some(("T", "student")));
    assert_eq!(guard.check(resolve("/cart").route), Navigation::Proceed);
    assert_eq!(guard.check(resolve("/learning/9").route), Navigation::Proceed);
}

#[test]
fn wrong_role_redirects_to_not_found() {
    let guard = guard_for(Some(("T", "student")));
    assert_eq!(guard.check(resolve("/admin").route), Navigation::Redirect(NOT_FOUND_PATH));
    assert_eq!(guard.check(resolve("/teacher").route), Navigation::Redirect(NOT_FOUND_PATH));
}

#[test]
fn matching_role_proceeds() {
    assert_eq!(guard_for(Some(("T", "admin"))).check(resolve("/admin").route), Navigation::Proceed);
    assert_eq!(
        guard_for(Some(("T", "teacher"))).check(resolve("/teacher/courses/1/edit").route),
        Navigation::Proceed
    );
}

#[test]
fn home_sends_admin_to_admin_area() {
    let guard = guard_for(Some(("T", "admin")));
    assert_eq!(guard.check(resolve("/").route), Navigation::Redirect(ADMIN_PATH));
}

#[test]
fn home_proceeds_for_everyone_else() {
    assert_eq!(guard_for(None).check(resolve("/").route), Navigation::Proceed);
    assert_eq!(guard_for(Some(("T", "teacher"))).check(resolve("/").route), Navigation::Proceed);
}

#[test]
fn only_home_has_admin_landing() {
    let guard = guard_for(Some(("T", "admin")));
    assert_eq!(guard.check(resolve("/courses").route), Navigation::Proceed);
}
