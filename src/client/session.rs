//! Client session
//!
//! One session per accepted connection. The session owns the read half of
//! the connection; the write half goes into the registry record so other
//! sessions can broadcast to it.
//!
//! Lifecycle: `Connecting -> Handshaking -> Active -> Leaving -> Closed`.
//! A session that never reaches `Active` (bad handshake, room full) is
//! rejected without ever touching the registry or broadcasting anything.
//! Once registered, every exit path converges on the same teardown: notice
//! (when the peer left cleanly), deregister, close.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::client::record::ClientRecord;
use crate::client::registry::ClientRegistry;
use crate::error::{ChatServerError, HandshakeError};
use crate::protocol;
use crate::relay::BroadcastRelay;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Handshaking,
    Active,
    Leaving,
    Closed,
}

/// Why an active session stopped reading.
enum LeaveReason {
    PeerClosed,
    ExitRequested,
    ReadFailed(std::io::Error),
}

/// Per-connection session state machine.
pub struct ClientSession {
    peer_addr: SocketAddr,
    registry: Arc<ClientRegistry>,
    relay: BroadcastRelay,
    state: SessionState,
}

impl ClientSession {
    pub fn new(registry: Arc<ClientRegistry>, peer_addr: SocketAddr) -> Self {
        let relay = BroadcastRelay::new(Arc::clone(&registry));
        Self {
            peer_addr,
            registry,
            relay,
            state: SessionState::Connecting,
        }
    }

    /// Drives the session from handshake to close.
    ///
    /// Returns an error only for rejections (failed handshake, room full);
    /// a registered session that later disconnects or errors out is a normal
    /// completion. Dropping the halves closes the connection on every path.
    pub async fn run<R, W>(mut self, mut reader: R, writer: W) -> Result<(), ChatServerError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        self.transition(SessionState::Handshaking);
        let name = match self.read_name(&mut reader).await {
            Ok(name) => name,
            Err(e) => {
                info!("Rejecting client {}: {}", self.peer_addr, e);
                self.transition(SessionState::Closed);
                return Err(e.into());
            }
        };

        let id = self.registry.allocate_id();
        let record = ClientRecord::new(id, name.clone(), writer, self.peer_addr);
        if let Err(e) = self.registry.add(record).await {
            warn!("Refusing client {} ({}): {}", self.peer_addr, name, e);
            self.transition(SessionState::Closed);
            return Err(e.into());
        }

        self.transition(SessionState::Active);
        info!("{} has joined from {} (id {})", name, self.peer_addr, id);
        self.relay.send(id, &protocol::joined_notice(&name)).await;

        let reason = self.relay_loop(&mut reader, id, &name).await;

        self.transition(SessionState::Leaving);
        match reason {
            LeaveReason::PeerClosed | LeaveReason::ExitRequested => {
                info!("{} has left", name);
                self.relay.send(id, &protocol::left_notice(&name)).await;
            }
            LeaveReason::ReadFailed(e) => {
                error!("Read from {} ({}) failed: {}", name, self.peer_addr, e);
            }
        }
        self.registry.remove(id).await;
        self.transition(SessionState::Closed);
        Ok(())
    }

    /// Reads the single fixed-size identity frame and validates the name.
    ///
    /// The frame is accumulated across short reads; TCP is free to split it
    /// into segments. A peer that closes before the full frame arrives is
    /// rejected.
    async fn read_name<R>(&self, reader: &mut R) -> Result<String, HandshakeError>
    where
        R: AsyncRead + Unpin,
    {
        let mut frame = [0u8; protocol::NAME_FRAME_LEN];
        let mut filled = 0;
        while filled < frame.len() {
            let n = reader.read(&mut frame[filled..]).await?;
            if n == 0 {
                if filled == 0 {
                    return Err(HandshakeError::ClosedBeforeName);
                }
                return Err(HandshakeError::TruncatedFrame(filled));
            }
            filled += n;
        }
        protocol::parse_name(&frame)
    }

    /// Active-state read loop. Each successful read is one message.
    async fn relay_loop<R>(&self, reader: &mut R, id: u64, name: &str) -> LeaveReason
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = vec![0u8; protocol::MAX_FRAME_LEN];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) => return LeaveReason::PeerClosed,
                Ok(n) => {
                    let payload = &buf[..n];
                    if protocol::is_exit(payload) {
                        return LeaveReason::ExitRequested;
                    }
                    let body = protocol::trim_payload(payload);
                    if body.is_empty() {
                        continue;
                    }
                    self.relay.send(id, &protocol::chat_frame(name, payload)).await;
                    info!("{} -> {}", String::from_utf8_lossy(body), name);
                }
                Err(e) => return LeaveReason::ReadFailed(e),
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {}: {:?} -> {:?}", self.peer_addr, self.state, next);
        self.state = next;
    }
}
