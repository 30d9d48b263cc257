//! Error handling
//!
//! Domain-specific error types for the chatroom server.

pub mod types;

pub use types::{ChatServerError, HandshakeError, RegistryError};
