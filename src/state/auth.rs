//! Session store: login, registration, logout, and profile refresh.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sits between the CLI/router and [`Api`]. Every operation resolves to an
//! [`Outcome`] or a plain `bool`; nothing here returns an error outward.
//! Session mutations always happen after the network call resolves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Map, Value};

use super::session::{Session, SessionHandle};
use crate::net::api::Api;
use crate::net::error::ApiError;
use crate::net::types::{LoginData, LoginRequest, Profile, RegisterRequest};

pub const MSG_LOGIN_FAILED: &str = "Login failed, please check your network connection";
pub const MSG_REGISTER_FAILED: &str = "Registration failed, please check your network connection";
pub const MSG_NO_PROFILE: &str = "No user is logged in";

/// Uniform `{success, data?, message?}` result of a store operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(String),
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    pub fn data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Self::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure(message) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
            }
        }
        state.end()
    }
}

/// Business failures keep the server's wording; everything else gets the
/// operation's generic fallback.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    if err.is_business() { err.message() } else { fallback.to_owned() }
}

#[derive(Clone)]
pub struct SessionStore {
    api: Api,
    session: SessionHandle,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Api, session: SessionHandle) -> Self {
        Self { api, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }

    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.session.logged_in()
    }

    /// Authenticate and, on success, install credential + profile.
    pub async fn login(&self, credentials: &LoginRequest) -> Outcome<LoginData> {
        match self.api.login(credentials).await {
            Ok(data) => {
                self.session
                    .establish(data.token.clone(), data.user.clone());
                tracing::info!(user_id = ?data.user.id, role = ?data.user.role, "logged in");
                Outcome::Success(data)
            }
            Err(err) => {
                tracing::error!(username = %credentials.username, error = %err, "login failed");
                Outcome::Failure(failure_message(&err, MSG_LOGIN_FAILED))
            }
        }
    }

    /// Create an account. Never touches the session.
    pub async fn register(&self, user: &RegisterRequest) -> Outcome<Value> {
        match self.api.register(user).await {
            Ok(data) => Outcome::Success(data),
            Err(err) => {
                tracing::error!(username = %user.username, error = %err, "registration failed");
                Outcome::Failure(failure_message(&err, MSG_REGISTER_FAILED))
            }
        }
    }

    /// Drop the session locally. No network call.
    pub fn logout(&self) {
        if self.session.clear() {
            tracing::info!("logged out");
        }
    }

    /// Merge `fields` into the current profile and re-persist. No network call.
    pub fn update_profile(&self, fields: &Map<String, Value>) -> Outcome<Profile> {
        match self.session.merge_profile(fields) {
            Ok(Some(profile)) => Outcome::Success(profile),
            Ok(None) => Outcome::Failure(MSG_NO_PROFILE.to_owned()),
            Err(e) => {
                tracing::warn!(error = %e, "profile update rejected");
                Outcome::Failure(e.to_string())
            }
        }
    }

    /// Rebuild the profile from durable storage. Returns whether one was found.
    pub fn load_persisted(&self) -> bool {
        self.session.restore()
    }

    /// Re-validate the credential by fetching the profile.
    ///
    /// Without a credential this returns `false` and makes no call. Any
    /// failure logs the user out.
    pub async fn refresh(&self) -> bool {
        if self
            .session
            .credential()
            .is_none_or(|credential| credential.is_empty())
        {
            return false;
        }
        match self.api.profile().await {
            Ok(profile) => {
                self.session.replace_profile(profile);
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "session refresh failed");
                self.logout();
                false
            }
        }
    }
}
