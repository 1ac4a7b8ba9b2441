use super::*;
use crate::net::types::Role;
use crate::state::session::{TOKEN_KEY, USER_KEY};
use crate::test_helpers::{Harness, err_envelope, ok_envelope, profile};
use crate::util::persistence::{KeyValueStore, MemoryStore};
use serde_json::json;
use std::sync::Arc;

fn store(h: &Harness) -> SessionStore {
    SessionStore::new(Api::new(h.http.clone()), h.session.clone())
}

fn credentials() -> LoginRequest {
    LoginRequest { username: "alice".into(), password: "secret".into(), role: Some(Role::Student) }
}

// =============================================================================
// Outcome
// =============================================================================

#[test]
fn outcome_serializes_success_shape() {
    let value = serde_json::to_value(Outcome::Success(json!({ "id": 1 }))).unwrap();
    assert_eq!(value, json!({ "success": true, "data": { "id": 1 } }));
}

#[test]
fn outcome_serializes_failure_shape() {
    let value = serde_json::to_value(Outcome::<Value>::Failure("bad credentials".into())).unwrap();
    assert_eq!(value, json!({ "success": false, "message": "bad credentials" }));
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_success_installs_and_persists_session() {
    let h = Harness::new();
    h.transport.reply(
        200,
        json!({ "code": 0, "data": { "token": "T", "user": { "id": 1, "role": "student" } } }),
    );
    let store = store(&h);

    let outcome = store.login(&credentials()).await;
    assert!(outcome.is_success());
    assert_eq!(h.session.credential().as_deref(), Some("T"));
    assert_eq!(h.session.profile(), Some(profile(1, "student")));
    assert!(store.logged_in());
    assert_eq!(h.storage.get(TOKEN_KEY).as_deref(), Some("T"));
    let persisted: Value = serde_json::from_str(&h.storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(persisted, json!({ "id": 1, "role": "student" }));

    let sent = &h.transport.requests()[0];
    assert_eq!(sent.path, "/user/login");
    assert_eq!(sent.body, Some(json!({ "username": "alice", "password": "secret", "role": "student" })));
}

#[tokio::test]
async fn login_business_failure_returns_server_message() {
    let h = Harness::new();
    h.transport.reply(200, err_envelope("bad credentials"));
    let store = store(&h);

    let outcome = store.login(&credentials()).await;
    assert_eq!(outcome, Outcome::Failure("bad credentials".into()));
    assert_eq!(h.session.snapshot(), Session::default());
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn failed_login_keeps_prior_session() {
    let h = Harness::logged_in("OLD", profile(7, "teacher"));
    h.transport.reply(200, err_envelope("bad credentials"));
    let store = store(&h);

    assert!(!store.login(&credentials()).await.is_success());
    assert_eq!(h.session.credential().as_deref(), Some("OLD"));
    assert_eq!(h.session.profile(), Some(profile(7, "teacher")));
}

#[tokio::test]
async fn login_network_failure_uses_generic_message() {
    let h = Harness::new();
    let store = store(&h);

    let outcome = store.login(&credentials()).await;
    assert_eq!(outcome.message(), Some(MSG_LOGIN_FAILED));
}

#[tokio::test]
async fn login_server_error_uses_generic_message() {
    let h = Harness::new();
    h.transport.reply(500, err_envelope("stack trace"));
    let store = store(&h);

    let outcome = store.login(&credentials()).await;
    assert_eq!(outcome.message(), Some(MSG_LOGIN_FAILED));
}

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_never_touches_session() {
    let h = Harness::new();
    h.transport
        .reply(200, ok_envelope(json!({ "id": 5, "token": "IGNORED" })));
    let store = store(&h);

    let user = RegisterRequest {
        username: "bob".into(),
        email: "bob@example.test".into(),
        password: "pw".into(),
        role: Role::Student,
    };
    let outcome = store.register(&user).await;
    assert_eq!(outcome.data(), Some(json!({ "id": 5, "token": "IGNORED" })));
    assert!(!store.logged_in());
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn register_failures_map_messages() {
    let h = Harness::new();
    h.transport.reply(200, err_envelope("username taken"));
    let store = store(&h);
    let user = RegisterRequest {
        username: "bob".into(),
        email: "bob@example.test".into(),
        password: "pw".into(),
        role: Role::Student,
    };

    assert_eq!(store.register(&user).await.message(), Some("username taken"));
    // Queue is empty now, so the transport fails.
    assert_eq!(store.register(&user).await.message(), Some(MSG_REGISTER_FAILED));
}

// =============================================================================
// logout / update_profile / load_persisted
// =============================================================================

#[test]
fn logout_clears_everything_and_is_idempotent() {
    let h = Harness::logged_in("T", profile(1, "student"));
    let store = store(&h);

    store.logout();
    store.logout();
    assert!(!store.logged_in());
    assert!(h.storage.is_empty());
    assert_eq!(h.transport.request_count(), 0);
}

#[test]
fn update_profile_merges_locally() {
    let h = Harness::logged_in("T", profile(1, "student"));
    let store = store(&h);

    let mut fields = Map::new();
    fields.insert("username".into(), json!("alice2"));
    let outcome = store.update_profile(&fields);

    let merged = outcome.data().unwrap();
    assert_eq!(merged.username.as_deref(), Some("alice2"));
    assert_eq!(merged.id, Some(1));
    assert_eq!(h.session.profile(), Some(merged));
    assert_eq!(h.transport.request_count(), 0);
}

#[test]
fn update_profile_without_profile_is_noop() {
    let h = Harness::new();
    let store = store(&h);

    let mut fields = Map::new();
    fields.insert("username".into(), json!("x"));
    assert_eq!(store.update_profile(&fields).message(), Some(MSG_NO_PROFILE));
    assert!(h.storage.is_empty());
}

#[test]
fn load_persisted_restores_profile() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(TOKEN_KEY, "T").unwrap();
    storage
        .set(USER_KEY, r#"{"id":3,"role":"admin"}"#)
        .unwrap();
    let h = Harness::with_storage(storage);
    let store = store(&h);

    assert!(!store.logged_in());
    assert!(store.load_persisted());
    assert!(store.logged_in());
    assert_eq!(store.snapshot().role(), Some(Role::Admin));
}

#[test]
fn load_persisted_discards_corrupt_profile() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(TOKEN_KEY, "T").unwrap();
    storage.set(USER_KEY, "{not json").unwrap();
    let h = Harness::with_storage(storage);
    let store = store(&h);

    assert!(!store.load_persisted());
    assert_eq!(h.session.profile(), None);
    assert_eq!(h.storage.get(USER_KEY), None);
}

// =============================================================================
// refresh
// =============================================================================

#[tokio::test]
async fn refresh_without_credential_makes_no_call() {
    let h = Harness::new();
    let store = store(&h);

    assert!(!store.refresh().await);
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn refresh_success_replaces_profile() {
    let h = Harness::logged_in("T", profile(1, "student"));
    h.transport
        .reply(200, ok_envelope(json!({ "id": 1, "role": "teacher", "username": "alice" })));
    let store = store(&h);

    assert!(store.refresh().await);
    let current = h.session.profile().unwrap();
    assert_eq!(current.role_kind(), Some(Role::Teacher));
    assert_eq!(current.username.as_deref(), Some("alice"));
    assert_eq!(h.session.credential().as_deref(), Some("T"));
    assert!(h.storage.get(USER_KEY).unwrap().contains("teacher"));
}

#[tokio::test]
async fn refresh_with_persisted_credential_only() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(TOKEN_KEY, "T").unwrap();
    let h = Harness::with_storage(storage);
    h.transport
        .reply(200, ok_envelope(json!({ "id": 9, "role": "student" })));
    let store = store(&h);

    assert!(store.refresh().await);
    assert!(store.logged_in());
    assert_eq!(h.transport.requests()[0].header("Authorization"), Some("Bearer T"));
}

#[tokio::test]
async fn refresh_business_failure_logs_out() {
    let h = Harness::logged_in("T", profile(1, "student"));
    h.transport.reply(200, err_envelope("token revoked"));
    let store = store(&h);

    assert!(!store.refresh().await);
    assert!(!store.logged_in());
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn refresh_network_failure_logs_out() {
    let h = Harness::logged_in("T", profile(1, "student"));
    let store = store(&h);

    assert!(!store.refresh().await);
    assert_eq!(h.session.snapshot(), Session::default());
}
