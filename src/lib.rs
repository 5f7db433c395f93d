//! Multi-group TCP chat with persistent, TTL-bounded history
//!
//! A line-oriented chat server: clients connect over plain TCP, pick a user
//! id and a group, get the last fifteen minutes of that group's conversation
//! replayed, and then chat. Every relayed message is written through to a
//! JSON history file, so a restarted server picks up where it left off.
//!
//! ```no_run
//! use groupchat_rs::server::{ChatServer, ServerConfig};
//!
//! # async fn example() -> groupchat_rs::error::Result<()> {
//! let server = ChatServer::bind(ServerConfig::default()).await?;
//! server.run().await
//! # }
//! ```

pub mod client;
pub mod error;
pub mod history;
pub mod hub;
pub mod persist;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod stats;

pub use client::ChatClient;
pub use error::{Error, Result};
pub use hub::ChatHub;
pub use server::{ChatServer, ServerConfig};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as fractional seconds since the Unix epoch
///
/// History timestamps use this form so the on-disk file stays comparable
/// across restarts.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
