//! Normalized failure shapes for every call through the HTTP client.
//!
//! ERROR HANDLING
//! ==============
//! Four kinds of failure reach callers: business errors (non-zero envelope
//! `code`), HTTP status errors (401 among them), transport errors (nothing came
//! back), and undecodable responses. All of them render to one user-facing
//! message and one `{success: false, message}` object, so call sites branch on
//! data rather than on error plumbing.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Serialize;

use super::transport::TransportError;

pub const MSG_UNAUTHORIZED: &str = "Authentication failed, please log in again";
pub const MSG_FORBIDDEN: &str = "Permission denied";
pub const MSG_NOT_FOUND: &str = "The requested resource does not exist";
pub const MSG_SERVER_ERROR: &str = "Server error";
pub const MSG_NETWORK: &str = "Network error, unable to connect to the server";
pub const MSG_REQUEST_CONFIG: &str = "Request configuration error";
pub const MSG_OPERATION_FAILED: &str = "Operation failed";
pub const MSG_UNEXPECTED_RESPONSE: &str = "Unexpected response from server";

/// Fixed message table for HTTP error statuses. Unmapped statuses use the
/// server-supplied `msg`, then the transport's own wording.
#[must_use]
pub fn status_message(status: u16, server_msg: Option<&str>) -> String {
    match status {
        401 => MSG_UNAUTHORIZED.to_owned(),
        403 => MSG_FORBIDDEN.to_owned(),
        404 => MSG_NOT_FOUND.to_owned(),
        500 => MSG_SERVER_ERROR.to_owned(),
        _ => server_msg
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .map_or_else(|| format!("Request failed with status code {status}"), str::to_owned),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The envelope came back with a non-zero `code`.
    #[error("{message}")]
    Business { code: i64, message: String },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// No response: connection failure or timeout.
    #[error("{}", MSG_NETWORK)]
    Network { detail: String },

    /// The request could not be built.
    #[error("{}", MSG_REQUEST_CONFIG)]
    Config { detail: String },

    /// The body was not a valid envelope, or `data` did not fit the expected type.
    #[error("{}", MSG_UNEXPECTED_RESPONSE)]
    Decode { detail: String },
}

impl ApiError {
    /// Build a business error, defaulting the message when the server sent none.
    #[must_use]
    pub fn business(code: i64, msg: Option<&str>) -> Self {
        let message = msg
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(MSG_OPERATION_FAILED)
            .to_owned();
        Self::Business { code, message }
    }

    #[must_use]
    pub fn status(status: u16, server_msg: Option<&str>) -> Self {
        Self::Status { status, message: status_message(status, server_msg) }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    #[must_use]
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Business { .. } => "E_BUSINESS",
            Self::Status { status: 401, .. } => "E_UNAUTHORIZED",
            Self::Status { status: 403, .. } => "E_FORBIDDEN",
            Self::Status { status: 404, .. } => "E_NOT_FOUND",
            Self::Status { .. } => "E_HTTP_STATUS",
            Self::Network { .. } => "E_NETWORK",
            Self::Config { .. } => "E_REQUEST_CONFIG",
            Self::Decode { .. } => "E_DECODE",
        }
    }

    /// The normalized `{success: false, message}` object.
    #[must_use]
    pub fn failure(&self) -> Failure {
        Failure { success: false, message: self.message() }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidRequest(detail) => Self::Config { detail },
            other @ (TransportError::Timeout | TransportError::Connect(_)) => {
                Self::Network { detail: other.to_string() }
            }
        }
    }
}

/// Serializable failure object handed to callers that expect data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub success: bool,
    pub message: String,
}
