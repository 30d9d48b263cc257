//! Server core functionality
//!
//! This module contains the accept loop, capacity admission, and server
//! configuration.

pub mod config;
pub mod core;

pub use config::ServerConfig;
pub use core::Server;
