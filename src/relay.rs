//! Broadcast relay
//!
//! Best-effort fan-out of one sender's message to every other registered
//! client.

use std::sync::Arc;

use log::warn;
use tokio::io::AsyncWriteExt;

use crate::client::ClientRegistry;

/// Relays messages to all registered clients except the sender.
pub struct BroadcastRelay {
    registry: Arc<ClientRegistry>,
}

impl BroadcastRelay {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Attempts to deliver `payload` once to every client registered at call
    /// time, except `sender_id`. Returns the number of successful deliveries.
    ///
    /// A failed write skips that recipient for this message only; tearing the
    /// peer down is its own session's job once it notices the broken
    /// connection. Writes happen outside the registry lock, so one slow peer
    /// cannot stall add/remove or other broadcasts' snapshots.
    pub async fn send(&self, sender_id: u64, payload: &[u8]) -> usize {
        let peers = self.registry.snapshot_excluding(sender_id).await;
        let mut delivered = 0;
        for peer in &peers {
            let mut writer = peer.writer().lock().await;
            match writer.write_all(payload).await {
                Ok(()) => match writer.flush().await {
                    Ok(()) => delivered += 1,
                    Err(e) => warn!(
                        "Failed to flush to {} ({}): {}",
                        peer.name(),
                        peer.peer_addr(),
                        e
                    ),
                },
                Err(e) => warn!(
                    "Failed to write to {} ({}): {}",
                    peer.name(),
                    peer.peer_addr(),
                    e
                ),
            }
        }
        delivered
    }
}
