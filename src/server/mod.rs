//! TCP server: listener, accept loop, configuration

pub mod config;
pub mod listener;

pub use config::{ServerConfig, DEFAULT_HISTORY_PATH};
pub use listener::ChatServer;
