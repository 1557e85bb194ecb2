//! Best completion times
//!
//! One record per (mode, difficulty, level), persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};
use crate::settings::{Difficulty, GameMode};

/// Which table a time belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreKey {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub key: ScoreKey,
    /// Elapsed milliseconds, or remaining milliseconds in timed mode
    pub time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreCard {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreCard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn best(&self, key: &ScoreKey) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.key == *key)
            .map(|e| e.time_ms)
    }

    /// Record a finished level. Returns true if this is a new best.
    pub fn record(&mut self, key: ScoreKey, time_ms: u64) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) else {
            self.entries.push(ScoreEntry { key, time_ms });
            return true;
        };

        let better = if key.mode.higher_time_is_better() {
            time_ms > entry.time_ms
        } else {
            time_ms < entry.time_ms
        };
        if better {
            entry.time_ms = time_ms;
        }
        better
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from `path`; an absent or unreadable file gives an empty card
    pub fn load(path: &Path) -> Self {
        match persistence::load::<ScoreCard>(path) {
            Ok(Some(card)) => {
                log::info!("Loaded {} best times", card.len());
                card
            }
            Ok(None) => Self::new(),
            Err(e) => {
                log::warn!("Ignoring unreadable score card {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save(path, self)
    }
}
