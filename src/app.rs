//! Application root.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the one [`SessionHandle`] of a running client and hands clones of it
//! to the HTTP client, the session store, and the router. There is no global
//! state; two `App`s never share a session.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::Api;
use crate::net::http::HttpClient;
use crate::net::transport::{ReqwestTransport, Transport, TransportError};
use crate::router::{Navigator, Router};
use crate::state::auth::SessionStore;
use crate::state::session::SessionHandle;
use crate::util::notify::Notifier;
use crate::util::persistence::KeyValueStore;

#[derive(Clone)]
pub struct App {
    pub session: SessionHandle,
    pub api: Api,
    pub store: SessionStore,
    pub router: Router,
}

impl App {
    /// Wire the client over the production HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::from_config(config)?;
        tracing::debug!(base_url = transport.base_url(), "transport ready");
        Ok(Self::with_transport(Arc::new(transport), storage, notifier, navigator))
    }

    /// Wire the client over any [`Transport`].
    #[must_use]
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = SessionHandle::new(storage);
        let http = HttpClient::new(transport, session.clone(), notifier, navigator);
        let api = Api::new(http);
        let store = SessionStore::new(api.clone(), session.clone());
        let router = Router::new(session.clone());
        Self { session, api, store, router }
    }

    /// Startup hook: rebuild the profile from durable storage.
    pub fn start(&self) -> bool {
        let restored = self.store.load_persisted();
        tracing::debug!(restored, logged_in = self.session.logged_in(), "session restored");
        restored
    }
}
