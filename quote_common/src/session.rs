//! Session-scoped state: the last quote shown to the user.
use log::warn;

use crate::quote::Quote;
use crate::result::Result;
use crate::storage::{KeyValueStore, LAST_VIEWED_KEY, MemoryStorage};

/// Session slot wrapper; by default backed by memory so it ends with the process.
#[derive(Debug, Default)]
pub struct Session<S = MemoryStorage> {
    storage: S,
}

impl<S: KeyValueStore> Session<S> {
    /// Create a session over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Overwrite the last-viewed snapshot with `quote`.
    pub fn record_view(&mut self, quote: &Quote) -> Result<()> {
        let json = serde_json::to_string(quote)?;
        self.storage.set(LAST_VIEWED_KEY, &json)
    }

    /// Snapshot of the last quote shown in this session, if any.
    pub fn last_viewed(&self) -> Option<Quote> {
        let raw = match self.storage.get(LAST_VIEWED_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read last viewed quote: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("Ignoring unparsable last viewed quote: {}", e);
                None
            }
        }
    }
}
