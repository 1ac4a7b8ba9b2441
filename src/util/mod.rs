//! Utility ports shared across the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate environment concerns (durable storage, user
//! notification) from session and network logic to keep both testable.

pub mod notify;
pub mod persistence;
