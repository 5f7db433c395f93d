//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::history::DEFAULT_HISTORY_TTL;

/// Default history file, relative to the working directory
pub const DEFAULT_HISTORY_PATH: &str = "chat_history.json";

/// Server configuration options
///
/// There is deliberately no idle or connection timeout: a silent client stays
/// connected until it disconnects or quits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent connections (0 = unlimited)
    pub max_connections: usize,

    /// Where chat history is saved and restored from
    pub history_path: PathBuf,

    /// Retention window for stored messages
    pub history_ttl: Duration,

    /// Longest accepted input line in bytes, terminator excluded
    pub max_line_bytes: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5003".parse().unwrap(),
            max_connections: 0, // Unlimited
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            history_ttl: DEFAULT_HISTORY_TTL,
            max_line_bytes: 1024,
            tcp_nodelay: true,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the history file location
    pub fn history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    /// Set the history retention window
    pub fn history_ttl(mut self, ttl: Duration) -> Self {
        self.history_ttl = ttl;
        self
    }

    /// Set the maximum accepted line length
    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.max_line_bytes = bytes;
        self
    }

    /// Leave Nagle's algorithm enabled on accepted sockets
    pub fn disable_nodelay(mut self) -> Self {
        self.tcp_nodelay = false;
        self
    }
}
