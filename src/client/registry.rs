//! Client registry
//!
//! Bounded, thread-safe collection of the currently connected clients.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::client::record::ClientRecord;
use crate::error::RegistryError;

/// Registry of active clients, bounded by `capacity`.
///
/// All mutation and snapshotting happens under one mutex so the size check
/// in `add` can never race with a concurrent insert. The lock is held only
/// for map operations, never across network I/O.
pub struct ClientRegistry {
    clients: Mutex<HashMap<u64, ClientRecord>>,
    capacity: usize,
    next_id: AtomicU64,
}

impl ClientRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            capacity,
            next_id: AtomicU64::new(1),
        }
    }

    /// Hands out the next client id. Ids are never reused within a process.
    pub fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Inserts a record, refusing it if the room is already full.
    pub async fn add(&self, record: ClientRecord) -> Result<(), RegistryError> {
        let mut clients = self.clients.lock().await;
        if clients.len() >= self.capacity {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        clients.insert(record.id(), record);
        Ok(())
    }

    /// Removes the record with `id`. Idempotent: removing an absent id is a
    /// no-op, which guards against double cleanup.
    pub async fn remove(&self, id: u64) -> Option<ClientRecord> {
        self.clients.lock().await.remove(&id)
    }

    /// Point-in-time copy of every record except the one with `id`.
    ///
    /// Broadcast iterates the copy, so concurrent add/remove cannot tear the
    /// recipient set mid-delivery.
    pub async fn snapshot_excluding(&self, id: u64) -> Vec<ClientRecord> {
        self.clients
            .lock()
            .await
            .values()
            .filter(|record| record.id() != id)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.lock().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::net::SocketAddr;
    use std::sync::Arc;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    fn record(registry: &ClientRegistry, name: &str) -> ClientRecord {
        ClientRecord::new(
            registry.allocate_id(),
            name.to_string(),
            tokio::io::sink(),
            test_addr(),
        )
    }

    #[tokio::test]
    async fn add_fails_when_full() {
        let registry = ClientRegistry::new(2);
        registry.add(record(&registry, "Alice")).await.unwrap();
        registry.add(record(&registry, "Bob")).await.unwrap();

        let refused = registry.add(record(&registry, "Carol")).await;
        assert!(matches!(
            refused,
            Err(RegistryError::CapacityExceeded { capacity: 2 })
        ));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = ClientRegistry::new(4);
        let rec = record(&registry, "Alice");
        let id = rec.id();
        registry.add(rec).await.unwrap();

        assert!(registry.remove(id).await.is_some());
        assert!(registry.remove(id).await.is_none());
        assert!(registry.remove(9999).await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn freed_capacity_can_be_reused() {
        let registry = ClientRegistry::new(1);
        let rec = record(&registry, "Alice");
        let id = rec.id();
        registry.add(rec).await.unwrap();
        registry.remove(id).await;

        registry.add(record(&registry, "Bob")).await.unwrap();
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn snapshot_excludes_exactly_the_sender() {
        let registry = ClientRegistry::new(4);
        let alice = record(&registry, "Alice");
        let bob = record(&registry, "Bob");
        let carol = record(&registry, "Carol");
        let bob_id = bob.id();
        registry.add(alice).await.unwrap();
        registry.add(bob).await.unwrap();
        registry.add(carol).await.unwrap();

        let snapshot = registry.snapshot_excluding(bob_id).await;
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|r| r.id() != bob_id));
    }

    #[tokio::test]
    async fn snapshot_of_unknown_id_returns_everyone() {
        let registry = ClientRegistry::new(4);
        registry.add(record(&registry, "Alice")).await.unwrap();
        registry.add(record(&registry, "Bob")).await.unwrap();

        assert_eq!(registry.snapshot_excluding(9999).await.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn ids_are_unique_under_concurrent_allocation() {
        let registry = Arc::new(ClientRegistry::new(4));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                (0..100).map(|_| registry.allocate_id()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(seen.insert(id), "id {} allocated twice", id);
            }
        }
        assert_eq!(seen.len(), 800);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_never_exceed_capacity() {
        let registry = Arc::new(ClientRegistry::new(8));
        let mut handles = Vec::new();
        for i in 0..32 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let rec = ClientRecord::new(
                    registry.allocate_id(),
                    format!("client-{}", i),
                    tokio::io::sink(),
                    test_addr(),
                );
                registry.add(rec).await.is_ok()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 8);
        assert_eq!(registry.len().await, 8);
    }
}
