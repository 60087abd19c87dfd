//! Per-channel mutual exclusion for history read-modify-write cycles.

use std::collections::HashMap;
use std::sync::Arc;

use poise::serenity_prelude::ChannelId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One lock per channel, created on first use.
///
/// Holding the guard returned by [`acquire`](Self::acquire) for the whole
/// load-modify-save cycle keeps concurrent messages in the same channel from
/// overwriting each other's history updates. Entries are never evicted; they
/// live for the lifetime of the process.
#[derive(Default)]
pub struct ChannelLocks {
    locks: Mutex<HashMap<ChannelId, Arc<Mutex<()>>>>,
}

impl ChannelLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `channel_id`, waiting if another task holds it.
    pub async fn acquire(&self, channel_id: ChannelId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(channel_id).or_default())
        };
        lock.lock_owned().await
    }
}
