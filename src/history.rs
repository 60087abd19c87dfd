//! Disk-backed per-channel conversation history.

mod locks;
mod store;
mod trim;

pub use locks::ChannelLocks;
pub use store::HistoryStore;
pub use trim::trim;
