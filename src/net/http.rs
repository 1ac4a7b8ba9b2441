//! HTTP client wrapper: the single choke-point for every backend call.
//!
//! ARCHITECTURE
//! ============
//! `request` runs a fixed pipeline:
//!
//! 1. Build a [`RequestContext`]. GET/DELETE payloads become query parameters,
//!    POST/PUT payloads a JSON body (`{}` when absent).
//! 2. Inject `Authorization: Bearer <credential>` and `X-User-Id: <id>` from
//!    the current session snapshot.
//! 3. Send through the [`Transport`]; one attempt, no retry.
//! 4. Normalize: 2xx + `code == 0` yields `data`; anything else becomes an
//!    [`ApiError`] and, unless the caller asked for silence, a notification.
//!
//! A 401 additionally clears the session and navigates to the login entry.
//! Several in-flight calls may all see a 401; clearing and navigating are both
//! idempotent, so each one repeats the side effect harmlessly.
//!
//! `X-User-Id` is a convenience for the backend. It authorizes nothing; the
//! bearer credential is what the server must verify.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::ApiError;
use super::transport::{Method, RequestContext, Transport, TransportResponse};
use super::types::Envelope;
use crate::router::{LOGIN_PATH, Navigator};
use crate::state::session::SessionHandle;
use crate::util::notify::Notifier;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Per-call knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Suppress the user-visible notification on failure. The error is still
    /// returned and the 401 side effect still runs.
    pub silent: bool,
}

impl RequestOptions {
    pub const SILENT: Self = Self { silent: true };
}

#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    session: SessionHandle,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl HttpClient {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionHandle,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { transport, session, notifier, navigator }
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::Get, path, None, RequestOptions::default())
            .await
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get_query<T: DeserializeOwned>(&self, path: &str, query: &impl Serialize) -> Result<T, ApiError> {
        let payload = to_payload(query)?;
        self.request(Method::Get, path, Some(payload), RequestOptions::default())
            .await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let payload = to_payload(body)?;
        self.request(Method::Post, path, Some(payload), RequestOptions::default())
            .await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, ApiError> {
        let payload = to_payload(body)?;
        self.request(Method::Put, path, Some(payload), RequestOptions::default())
            .await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::Delete, path, None, RequestOptions::default())
            .await
    }

    /// Issue one call and unwrap its envelope.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Business`] when the envelope `code` is non-zero.
    /// - [`ApiError::Status`] for non-2xx statuses (401 also clears the session).
    /// - [`ApiError::Network`] when no response arrived (including timeout).
    /// - [`ApiError::Config`] when the request could not be built.
    /// - [`ApiError::Decode`] when the body or `data` has the wrong shape.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, %method, path, "sending request");

        let result = match self.prepare(method, path, payload) {
            Ok(ctx) => match self.transport.send(ctx).await {
                Ok(response) => self.unwrap_response(response),
                Err(e) => Err(ApiError::from(e)),
            },
            Err(e) => Err(e),
        };
        let decoded =
            result.and_then(|data| serde_json::from_value(data).map_err(|e| ApiError::Decode { detail: e.to_string() }));

        match decoded {
            Ok(data) => {
                tracing::debug!(%request_id, "request succeeded");
                Ok(data)
            }
            Err(err) => {
                self.report(&err, request_id, method, path, options);
                Err(err)
            }
        }
    }

    /// Build the per-call context, attaching identity headers.
    fn prepare(&self, method: Method, path: &str, payload: Option<Value>) -> Result<RequestContext, ApiError> {
        let mut ctx = RequestContext::new(method, path);
        if method.sends_body() {
            ctx.body = Some(payload.unwrap_or_else(|| Value::Object(Map::new())));
        } else if let Some(payload) = payload {
            ctx.query = query_pairs(payload)?;
        }

        let session = self.session.snapshot();
        if let Some(credential) = session.credential.as_deref().filter(|c| !c.is_empty()) {
            ctx.headers
                .push((AUTHORIZATION_HEADER.to_owned(), format!("Bearer {credential}")));
        }
        if let Some(user_id) = session.user_id() {
            ctx.headers
                .push((USER_ID_HEADER.to_owned(), user_id.to_string()));
        }
        Ok(ctx)
    }

    fn unwrap_response(&self, response: TransportResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            let server_msg = serde_json::from_str::<Envelope>(&response.body)
                .ok()
                .and_then(|envelope| envelope.msg);
            if response.status == 401 {
                self.expire_session();
            }
            return Err(ApiError::status(response.status, server_msg.as_deref()));
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let envelope: Envelope =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode { detail: e.to_string() })?;
        if envelope.is_success() {
            Ok(envelope.data)
        } else {
            Err(ApiError::business(envelope.code, envelope.msg.as_deref()))
        }
    }

    /// The credential was rejected: drop the session and send the user to log in.
    fn expire_session(&self) {
        let cleared = self.session.clear();
        tracing::warn!(cleared, "credential rejected; session cleared");
        self.navigator.navigate(LOGIN_PATH);
    }

    fn report(&self, err: &ApiError, request_id: Uuid, method: Method, path: &str, options: RequestOptions) {
        match err {
            ApiError::Business { code, message } => {
                tracing::warn!(%request_id, %method, path, code, %message, "business error");
            }
            ApiError::Status { status, message } => {
                tracing::warn!(%request_id, %method, path, status, %message, "http error");
            }
            ApiError::Network { detail } => {
                tracing::error!(%request_id, %method, path, %detail, "network error");
            }
            ApiError::Config { detail } | ApiError::Decode { detail } => {
                tracing::error!(%request_id, %method, path, code = err.error_code(), %detail, "request error");
            }
        }
        if !options.silent {
            self.notifier.error(&err.message());
        }
    }
}

fn to_payload(value: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Config { detail: e.to_string() })
}

/// Flatten a JSON object into query pairs. Nulls are skipped, arrays repeat
/// the key, nested objects are sent as JSON text.
pub(crate) fn query_pairs(payload: Value) -> Result<Vec<(String, String)>, ApiError> {
    let map = match payload {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::Config { detail: format!("query parameters must be an object, got {other}") });
        }
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
