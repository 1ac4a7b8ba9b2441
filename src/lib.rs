//! EduSphere client core.
//!
//! ARCHITECTURE
//! ============
//! - [`net`]: transport seam, HTTP client wrapper with identity headers and
//!   envelope normalization, typed endpoint catalogue.
//! - [`state`]: the shared, persisted session and the store operations over it.
//! - [`router`]: route table, navigation guard, guarded navigation.
//! - [`util`]: storage and notification ports.
//! - [`app`]: the application root that wires one session through all of it.

pub mod app;
pub mod config;
pub mod net;
pub mod router;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_helpers;

pub use app::App;
pub use config::{ClientConfig, ConfigError};
pub use net::error::ApiError;
pub use state::auth::{Outcome, SessionStore};
pub use state::session::{Session, SessionHandle};
