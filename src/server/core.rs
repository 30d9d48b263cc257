//! Accept loop and capacity admission.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::client::{ClientRegistry, ClientSession};
use crate::server::config::ServerConfig;

pub struct Server {
    registry: Arc<ClientRegistry>,
    admission: Arc<Semaphore>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listening socket. A bind failure aborts startup; it is the
    /// only error that is fatal to the process.
    pub async fn new(config: ServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.socket_addr()).await?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            registry: Arc::new(ClientRegistry::new(config.max_clients)),
            admission: Arc::new(Semaphore::new(config.max_clients)),
            listener,
            config: Arc::new(config),
        })
    }

    /// Address the listener actually bound to (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one session task per connection.
    ///
    /// Admission is gated by a counting semaphore sized to `max_clients`: a
    /// connection that arrives while the room is full is closed on the spot,
    /// before a session is ever spawned. The registry re-checks capacity at
    /// registration time as a second guard. Session tasks live in a
    /// `JoinSet` so their completion is observed rather than detached.
    pub async fn start(self) {
        info!(
            "Starting chatroom server on {} (max {} clients)",
            self.config.socket_addr(),
            self.config.max_clients
        );

        let mut sessions = JoinSet::new();
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let permit = match Arc::clone(&self.admission).try_acquire_owned() {
                            Ok(permit) => permit,
                            Err(_) => {
                                warn!("Room is full, refusing {}", addr);
                                // Dropping the stream closes the connection
                                // without any broadcast.
                                continue;
                            }
                        };

                        let registry = Arc::clone(&self.registry);
                        sessions.spawn(async move {
                            let _permit = permit;
                            let (read_half, write_half) = stream.into_split();
                            let session = ClientSession::new(registry, addr);
                            if let Err(e) = session.run(read_half, write_half).await {
                                warn!("Session for {} rejected: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                },
                Some(joined) = sessions.join_next() => {
                    if let Err(e) = joined {
                        error!("Session task failed: {}", e);
                    }
                }
            }
        }
    }
}
