//! Central chat hub: groups, history and persistence behind one lock
//!
//! Every session talks to the same `ChatHub`. Join, leave, publish and
//! replay all go through it, and the hub keeps the invariant the rest of the
//! crate relies on: membership changes, history appends and history saves are
//! serialized by a single lock, while socket delivery always happens outside
//! that lock through per-member outbox channels.
//!
//! # Architecture
//!
//! ```text
//!   [Session 1]   [Session 2]   [Session N]
//!        │             │             │
//!        └──────┬──────┴─────────────┘
//!               ▼ join / leave / publish / replay
//!       ┌──────────────────────────────┐
//!       │ ChatHub                      │
//!       │  RwLock<HubState {           │
//!       │    registry: GroupRegistry,  │
//!       │    history:  HistoryStore,   │──── save() ──► chat_history.json
//!       │  }>                          │   (inside the write guard)
//!       └──────────────┬───────────────┘
//!                      │ membership snapshot (guard released)
//!        ┌─────────────┼─────────────┐
//!        ▼             ▼             ▼
//!   outbox tx     outbox tx     outbox tx
//!        │             │             │
//!   writer task   writer task   writer task ──► TCP
//! ```
//!
//! A publish that persists its message does history append, file save and
//! membership snapshot under one write guard, which makes the on-disk file a
//! prefix-consistent record of accepted messages. Fan-out never blocks on a
//! slow socket because outboxes are unbounded and drained elsewhere.

pub mod store;

pub use store::ChatHub;
