//! Chat server listener
//!
//! Handles the TCP accept loop and spawns one session task per connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;

use crate::error::Result;
use crate::hub::ChatHub;
use crate::persist::HistoryPersistence;
use crate::server::config::ServerConfig;
use crate::session::ConnectionSession;
use crate::stats::ServerStats;

/// Group chat server
pub struct ChatServer {
    config: ServerConfig,
    listener: TcpListener,
    hub: Arc<ChatHub>,
    next_session_id: AtomicU64,
    connection_semaphore: Option<Arc<Semaphore>>,
    total_connections: AtomicU64,
    active_connections: Arc<AtomicU64>,
    started_at: Instant,
}

impl ChatServer {
    /// Bind the listener and restore persisted history
    ///
    /// History is loaded before the first client can connect, so an early
    /// joiner already sees messages from before the restart.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let hub = Arc::new(ChatHub::with_ttl(
            HistoryPersistence::new(config.history_path.clone()),
            config.history_ttl,
        ));
        hub.restore().await;

        let listener = TcpListener::bind(config.bind_addr).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            history = %config.history_path.display(),
            "Chat server listening"
        );

        let connection_semaphore = if config.max_connections > 0 {
            Some(Arc::new(Semaphore::new(config.max_connections)))
        } else {
            None
        };

        Ok(Self {
            config,
            listener,
            hub,
            next_session_id: AtomicU64::new(1),
            connection_semaphore,
            total_connections: AtomicU64::new(0),
            active_connections: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        })
    }

    /// Get a reference to the chat hub
    pub fn hub(&self) -> &Arc<ChatHub> {
        &self.hub
    }

    /// The address the listener actually bound, useful with port 0
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the server
    ///
    /// This method blocks until the server is shut down.
    pub async fn run(&self) -> Result<()> {
        self.accept_loop().await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop() => result,
        }
    }

    async fn accept_loop(&self) -> Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }

    async fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        // Check connection limit
        let permit = if let Some(ref sem) = self.connection_semaphore {
            match Arc::clone(sem).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::warn!(peer = %peer_addr, "Connection rejected: limit reached");
                    return;
                }
            }
        } else {
            None
        };

        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        self.total_connections.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            session_id = session_id,
            peer = %peer_addr,
            "New connection"
        );

        if let Err(e) = self.configure_socket(&socket) {
            tracing::error!(error = %e, "Failed to configure socket");
            return;
        }

        let hub = Arc::clone(&self.hub);
        let max_line = self.config.max_line_bytes;
        let active = Arc::clone(&self.active_connections);
        active.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            // Hold the connection slot until the session is done
            let _permit = permit;

            let session = ConnectionSession::new(session_id, peer_addr, hub, max_line);
            if let Err(e) = session.run(socket).await {
                tracing::debug!(
                    session_id = session_id,
                    error = %e,
                    "Connection error"
                );
            }

            active.fetch_sub(1, Ordering::Relaxed);
            tracing::debug!(session_id = session_id, "Connection closed");
        });
    }

    fn configure_socket(&self, socket: &TcpStream) -> std::io::Result<()> {
        if self.config.tcp_nodelay {
            socket.set_nodelay(true)?;
        }
        Ok(())
    }

    /// Server-wide counters
    pub fn stats(&self) -> ServerStats {
        ServerStats {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
