//! User-visible notifications.
//!
//! The HTTP layer reports failures to the user through [`Notifier`] unless the
//! caller opts out per request. Front-ends supply their own implementation
//! (toast, stderr line); [`LogNotifier`] routes everything to `tracing`.

/// Sink for user-facing error messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(%message, "user notification");
    }
}
