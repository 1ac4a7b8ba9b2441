//! Client-side state: the shared session and the store operations over it.

pub mod auth;
pub mod session;
