//! Chatroom Server
//!
//! A line-oriented TCP chat server: clients identify themselves with a
//! fixed-size name frame, then every message they send is relayed to all
//! other connected clients.

pub mod client;
pub mod error;
pub mod protocol;
pub mod relay;
pub mod server;

pub use client::{ClientRecord, ClientRegistry, ClientSession};
pub use relay::BroadcastRelay;
pub use server::{Server, ServerConfig};
