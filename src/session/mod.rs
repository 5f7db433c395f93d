//! Client sessions
//!
//! A session owns one TCP connection and walks it through the login
//! handshake, the history replay, and the chat loop, talking to the shared
//! hub for everything group-wide.

pub mod connection;
pub mod state;

pub use connection::ConnectionSession;
pub use state::{SessionPhase, SessionState};
