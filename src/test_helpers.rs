//! Fakes shared by unit tests across modules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::net::http::HttpClient;
use crate::net::transport::{RequestContext, Transport, TransportError, TransportResponse};
use crate::net::types::Profile;
use crate::router::Navigator;
use crate::state::session::SessionHandle;
use crate::util::notify::Notifier;
use crate::util::persistence::{KeyValueStore, MemoryStore, StorageError};

// =============================================================================
// ScriptedTransport
// =============================================================================

/// Replays queued responses in order and records every request it sees.
/// When the queue runs dry it answers with a transport failure.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub seen: Mutex<Vec<RequestContext>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: Value) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse { status, body: body.to_string() }));
        self
    }

    pub fn reply_raw(&self, status: u16, body: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse { status, body: body.to_owned() }));
        self
    }

    pub fn fail(&self, err: TransportError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<RequestContext> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: RequestContext) -> Result<TransportResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted reply".into())))
    }
}

// =============================================================================
// Recorders
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_owned());
    }
}

// =============================================================================
// FailingStore
// =============================================================================

/// Reads succeed from an inner memory store; every write is rejected.
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only".into()))
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn ok_envelope(data: Value) -> Value {
    json!({ "code": 0, "msg": "success", "data": data })
}

pub fn err_envelope(msg: &str) -> Value {
    json!({ "code": 1, "msg": msg, "data": null })
}

pub fn profile(id: i64, role: &str) -> Profile {
    Profile { id: Some(id), role: Some(role.to_owned()), ..Profile::default() }
}

/// Fully wired client over a scripted transport and in-memory storage.
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MemoryStore>,
    pub session: SessionHandle,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
    pub http: HttpClient,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStore::new()))
    }

    pub fn with_storage(storage: Arc<MemoryStore>) -> Self {
        let transport = ScriptedTransport::new();
        let session = SessionHandle::new(storage.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let http = HttpClient::new(transport.clone(), session.clone(), notifier.clone(), navigator.clone());
        Self { transport, storage, session, notifier, navigator, http }
    }

    /// Harness with an already logged-in session.
    pub fn logged_in(token: &str, profile: Profile) -> Self {
        let harness = Self::new();
        harness.session.establish(token.to_owned(), profile);
        harness
    }
}
