//! Shared session state: who is logged in, backed by durable storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionHandle`] is created by the application root and cloned into
//! the HTTP client (header injection, 401 clearing), the session store
//! (login/refresh/logout), and the navigation guard (read-only checks).
//!
//! PERSISTENCE
//! ===========
//! Two keys: [`TOKEN_KEY`] holds the raw credential and [`USER_KEY`] the JSON
//! profile. The credential is read straight from storage at construction; the
//! profile is only reconstructed by [`SessionHandle::restore`]. Every mutation
//! writes through while the lock is held, so memory and storage change in the
//! same order. Storage write failures are logged and never surface.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

use crate::net::types::{Profile, Role};
use crate::util::persistence::{KeyValueStore, load_json, save_json};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub credential: Option<String>,
    pub profile: Option<Profile>,
}

impl Session {
    /// Credential present and non-empty AND profile present.
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.credential.as_deref().is_some_and(|c| !c.is_empty()) && self.profile.is_some()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.profile.as_ref().and_then(|p| p.id)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().and_then(Profile::role_kind)
    }
}

struct Inner {
    storage: Arc<dyn KeyValueStore>,
    session: Mutex<Session>,
}

/// Cloneable handle to the single session of one application root.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.lock();
        f.debug_struct("SessionHandle")
            .field("has_credential", &session.credential.is_some())
            .field("profile_id", &session.user_id())
            .finish()
    }
}

impl SessionHandle {
    /// Create the handle, picking up any credential already in `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let credential = storage.get(TOKEN_KEY).filter(|token| !token.is_empty());
        Self { inner: Arc::new(Inner { storage, session: Mutex::new(Session { credential, profile: None }) }) }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.lock().credential.clone()
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    /// Recomputed from current state on every call.
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.lock().logged_in()
    }

    /// Install a fresh credential + profile (successful login).
    pub fn establish(&self, credential: String, profile: Profile) {
        let mut session = self.lock();
        self.write_token(&credential);
        self.write_profile(&profile);
        session.credential = Some(credential);
        session.profile = Some(profile);
    }

    /// Replace the profile, keeping the credential (successful refresh).
    pub fn replace_profile(&self, profile: Profile) {
        let mut session = self.lock();
        self.write_profile(&profile);
        session.profile = Some(profile);
    }

    /// Merge `patch` into the current profile and re-persist.
    ///
    /// Returns `Ok(None)` without touching anything when no profile exists.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the merged object is not a valid profile;
    /// the stored profile is left unchanged.
    pub fn merge_profile(&self, patch: &Map<String, Value>) -> Result<Option<Profile>, serde_json::Error> {
        let mut session = self.lock();
        let Some(current) = session.profile.as_ref() else {
            return Ok(None);
        };
        let merged = current.merged(patch)?;
        self.write_profile(&merged);
        session.profile = Some(merged.clone());
        Ok(Some(merged))
    }

    /// Drop credential, profile, and both durable keys. Safe to call any
    /// number of times; returns whether there was anything in memory to clear.
    pub fn clear(&self) -> bool {
        let mut session = self.lock();
        let had_state = session.credential.is_some() || session.profile.is_some();
        *session = Session::default();
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage().remove(key) {
                tracing::warn!(key, error = %e, "failed to remove persisted session entry");
            }
        }
        had_state
    }

    /// Reconstruct the profile from durable storage. A corrupt copy is
    /// discarded and the profile left empty. Returns whether a profile is now
    /// present.
    pub fn restore(&self) -> bool {
        let mut session = self.lock();
        match load_json::<Profile>(self.storage(), USER_KEY) {
            Ok(Some(profile)) => {
                session.profile = Some(profile);
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "persisted profile is corrupt; discarding");
                if let Err(e) = self.storage().remove(USER_KEY) {
                    tracing::warn!(key = USER_KEY, error = %e, "failed to remove corrupt profile");
                }
                session.profile = None;
                false
            }
        }
    }

    fn write_token(&self, credential: &str) {
        if let Err(e) = self.storage().set(TOKEN_KEY, credential) {
            tracing::warn!(key = TOKEN_KEY, error = %e, "failed to persist credential");
        }
    }

    fn write_profile(&self, profile: &Profile) {
        if let Err(e) = save_json(self.storage(), USER_KEY, profile) {
            tracing::warn!(key = USER_KEY, error = %e, "failed to persist profile");
        }
    }
}
