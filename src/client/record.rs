//! Module `record`
//!
//! Defines the `ClientRecord` struct: one registered chat participant's
//! identity plus the write half of its connection.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncWrite;
use tokio::sync::Mutex;

/// Shared handle to the write half of a client connection.
///
/// Broadcasts from other sessions write through this handle, so it carries
/// its own lock; the registry lock is never held across a write.
pub type ClientWriter = Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>;

/// A registered chat participant.
///
/// The record is created once the identity handshake succeeds and removed by
/// its own session on disconnect. Cloning is cheap (the writer is shared),
/// which is what makes registry snapshots O(capacity).
#[derive(Clone)]
pub struct ClientRecord {
    id: u64,
    name: String,
    writer: ClientWriter,
    peer_addr: SocketAddr,
}

impl ClientRecord {
    pub fn new<W>(id: u64, name: String, writer: W, peer_addr: SocketAddr) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            id,
            name,
            writer: Arc::new(Mutex::new(Box::new(writer))),
            peer_addr,
        }
    }

    /// Unique id, monotonically assigned for the process lifetime.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name established during the handshake.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remote address of the connection.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub(crate) fn writer(&self) -> &ClientWriter {
        &self.writer
    }
}

impl fmt::Debug for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("peer_addr", &self.peer_addr)
            .finish()
    }
}
