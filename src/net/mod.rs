//! Networking: transport seam, HTTP client wrapper, endpoint catalogue.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` moves bytes, `http` applies identity headers and envelope
//! normalization, `api` names every endpoint, `types` defines the wire schema,
//! and `error` the failure taxonomy callers branch on.

pub mod api;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
