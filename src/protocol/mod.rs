//! Wire protocol for the chat server
//!
//! Everything on the wire is line-oriented text terminated by CRLF. A session
//! goes through a two-step handshake before it can chat:
//!
//! ```text
//! Server                                          Client
//!   |                                               |
//!   |--- banner + "Enter your user id: " ---------->|
//!   |<-------------- "alice\r\n" -------------------|
//!   |--- "Enter group id to join (e.g., group1): " >|
//!   |<-------------- "group1\r\n" ------------------|
//!   |--- joined block + recent-history replay ----->|
//!   |                                               |
//!   |<-------------- "hi all\r\n" ------------------|
//!   |--- "[group1] alice: hi all\r\n" --> (peers)   |
//!   |                                               |
//!   |<-------------- "/quit\r\n" -------------------|
//!   |--- "Goodbye!\r\n" --------------------------->|
//! ```
//!
//! Prompts deliberately carry no trailing newline; every other server line
//! ends with CRLF. Empty input at either prompt closes the connection.

pub mod line;
pub mod text;

pub use line::LineReader;
pub use text::{
    chat_line, is_quit, join_confirmation, joined_notice, left_notice, replay_empty,
    replay_footer, replay_header, GOODBYE, GROUP_PROMPT, QUIT_COMMAND, USER_PROMPT, WELCOME,
};
