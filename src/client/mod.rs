//! Client management
//!
//! Connected-client records, the bounded registry they live in, and the
//! per-connection session lifecycle.

pub mod record;
pub mod registry;
pub mod session;

pub use record::{ClientRecord, ClientWriter};
pub use registry::ClientRegistry;
pub use session::{ClientSession, SessionState};
