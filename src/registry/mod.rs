//! Group membership registry
//!
//! The registry tracks which sessions are in which group. Each member carries
//! an unbounded outbox channel; broadcasting writes into those channels and a
//! per-session writer task drains them to the socket.
//!
//! # Architecture
//!
//! ```text
//!                      GroupRegistry (inside the hub lock)
//!                     ┌──────────────────────────────┐
//!                     │ groups: HashMap<GroupId,     │
//!                     │   Vec<Member {               │
//!                     │     session_id,              │
//!                     │     user_id,                 │
//!                     │     outbox: mpsc::Tx,        │
//!                     │   }>                         │
//!                     │ >                            │
//!                     └───────────┬──────────────────┘
//!                                 │ snapshot()
//!         ┌───────────────────────┼───────────────────────┐
//!         ▼                       ▼                       ▼
//!    [Member]                [Member]                [Member]
//!    outbox.send()           outbox.send()           outbox.send()
//!         │                       │                       │
//!         └──► writer task ──► TCP socket (one per session)
//! ```
//!
//! # Zero-Copy Fan-Out
//!
//! Broadcast lines are `bytes::Bytes`, so every member's outbox holds a
//! reference-counted view of the same allocation; fan-out clones handles,
//! never the line itself.

pub mod member;
pub mod store;

pub use member::Member;
pub use store::GroupRegistry;
