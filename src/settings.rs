//! Game settings and preferences
//!
//! Persisted separately from the score card as a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{self, PersistenceError};

/// Wall drawing speed tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Option-menu index (Normal, Hard, Easy). Unknown indices are a caller bug.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Difficulty::Normal,
            1 => Difficulty::Hard,
            2 => Difficulty::Easy,
            _ => panic!("unknown difficulty index {index}"),
        }
    }

    /// Pixels each end of a wall advances per tick
    pub fn wall_speed(&self) -> i32 {
        let speed = match self {
            Difficulty::Easy => VELOCITY_MAX * 3.0,
            Difficulty::Normal => VELOCITY_MAX * 1.5,
            Difficulty::Hard => VELOCITY_MAX * 0.9,
        };
        speed.round() as i32
    }
}

/// Rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// One life per ball plus one, no clock
    #[default]
    Casual,
    /// A single life
    Survival,
    /// Casual lives, but the level must be cleared before the clock runs out
    Timed,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Casual => "Casual",
            GameMode::Survival => "Survival",
            GameMode::Timed => "Timed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "casual" => Some(GameMode::Casual),
            "survival" => Some(GameMode::Survival),
            "timed" => Some(GameMode::Timed),
            _ => None,
        }
    }

    /// Option-menu index. Unknown indices are a caller bug.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => GameMode::Casual,
            1 => GameMode::Survival,
            2 => GameMode::Timed,
            _ => panic!("unknown game mode index {index}"),
        }
    }

    /// Starting lives for a level with `ball_count` balls
    pub fn starting_lives(&self, ball_count: usize) -> u32 {
        match self {
            GameMode::Survival => 1,
            GameMode::Casual | GameMode::Timed => ball_count as u32 + 1,
        }
    }

    /// Clock budget in ticks, if the mode has one
    pub fn time_limit_ticks(&self, ball_count: usize) -> Option<u64> {
        match self {
            GameMode::Timed => {
                let seconds = TIMED_BASE_SECONDS + TIMED_SECONDS_PER_BALL * ball_count as u64;
                Some(seconds * TICKS_PER_SECOND)
            }
            GameMode::Casual | GameMode::Survival => None,
        }
    }

    /// Whether a larger recorded time is better (remaining clock) or worse
    /// (elapsed clock)
    pub fn higher_time_is_better(&self) -> bool {
        matches!(self, GameMode::Timed)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    /// Starting level; level `n` has `n` balls
    pub level: u32,
    /// Balls bounce off each other
    pub collision: bool,

    // === Collaborator preferences (stored, not used by the simulation) ===
    pub audio: bool,
    pub vibrate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            mode: GameMode::Casual,
            level: 1,
            collision: true,
            audio: true,
            vibrate: true,
        }
    }
}

impl Settings {
    /// Level clamped to the playable range
    pub fn effective_level(&self) -> u32 {
        self.level.clamp(BALL_MIN as u32, BALL_MAX as u32)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match persistence::load::<Settings>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
