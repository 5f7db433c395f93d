//! TTL-bounded chat history
//!
//! Every broadcast chat message is also recorded here, and late joiners get
//! the recent window replayed before live traffic starts. Retention is a
//! fixed time window (15 minutes by default) enforced lazily on append, load,
//! and read; no timer task ever walks the store.

pub mod entry;
pub mod store;

pub use entry::HistoryEntry;
pub use store::{HistoryMap, HistoryStore, DEFAULT_HISTORY_TTL};
