//! Reads and writes per-channel history files.

use std::io::ErrorKind;
use std::path::PathBuf;

use log::debug;
use poise::serenity_prelude::ChannelId;
use tokio::fs;

use crate::error::{BotError, Result};
use crate::history::trim;
use crate::types::Turn;

/// Disk-backed store of conversation histories, one JSON file per channel.
pub struct HistoryStore {
    dir: PathBuf,
    max_len: usize,
}

impl HistoryStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// Histories are trimmed to `max_len` turns on save.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, max_len: usize) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| BotError::Persistence {
            path: dir.clone(),
            message: format!("Failed to create history directory: {e}"),
        })?;
        Ok(Self { dir, max_len })
    }

    /// Load the history for `channel_id`.
    ///
    /// A channel with no recorded history loads as empty. A record holding a
    /// turn with an empty `parts` list is rejected as corrupt; everything the
    /// in-memory constructors build carries at least one part, so only a
    /// hand-edited file can violate that.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub async fn load(&self, channel_id: ChannelId) -> Result<Vec<Turn>> {
        let path = self.history_path(channel_id);
        match fs::read(&path).await {
            Ok(bytes) => {
                let history: Vec<Turn> =
                    serde_json::from_slice(&bytes).map_err(|e| BotError::CorruptHistory {
                        channel: channel_id,
                        message: format!("Failed to decode {}: {e}", path.display()),
                    })?;
                if history.iter().any(|turn| turn.parts.is_empty()) {
                    return Err(BotError::CorruptHistory {
                        channel: channel_id,
                        message: format!("Turn with no parts in {}", path.display()),
                    });
                }
                Ok(history)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history recorded for channel {channel_id}");
                Ok(Vec::new())
            }
            Err(e) => Err(BotError::Persistence {
                path,
                message: format!("Failed to read history: {e}"),
            }),
        }
    }

    /// Save the history for `channel_id`, trimming it first.
    ///
    /// The file is written to a temporary path and renamed into place so a
    /// crash mid-write never leaves a half-written history behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or either filesystem step fails.
    pub async fn save(&self, channel_id: ChannelId, history: Vec<Turn>) -> Result<()> {
        let history = trim(history, self.max_len);
        let path = self.history_path(channel_id);

        let json = serde_json::to_string_pretty(&history).map_err(|e| BotError::Persistence {
            path: path.clone(),
            message: format!("Failed to serialize history: {e}"),
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| BotError::Persistence {
            path: tmp.clone(),
            message: format!("Failed to write history: {e}"),
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| BotError::Persistence {
            path,
            message: format!("Failed to replace history file: {e}"),
        })?;

        debug!("Saved {} turns for channel {channel_id}", history.len());
        Ok(())
    }

    fn history_path(&self, channel_id: ChannelId) -> PathBuf {
        self.dir.join(format!("{channel_id}.json"))
    }
}
