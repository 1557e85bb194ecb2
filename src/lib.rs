//! Jezzin - A territory-capturing arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (regions, walls, balls, game state)
//! - `settings`: Player preferences (difficulty, mode, level)
//! - `scorecard`: Best completion times per mode/difficulty/level
//! - `persistence`: Versioned JSON save/load

pub mod persistence;
pub mod scorecard;
pub mod settings;
pub mod sim;

pub use scorecard::{ScoreCard, ScoreKey};
pub use settings::{Difficulty, GameMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one wall/ball step per tick)
    pub const TICKS_PER_SECOND: u64 = 30;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: i32 = 480;
    pub const PLAYFIELD_HEIGHT: i32 = 650;

    /// Ball defaults
    pub const BALL_DIMENSION: f32 = 32.0;
    /// Maximum per-axis ball speed (pixels per tick)
    pub const VELOCITY_MAX: f32 = BALL_DIMENSION / 4.0;
    /// Minimum per-axis ball speed (pixels per tick)
    pub const VELOCITY_MIN: f32 = BALL_DIMENSION / 20.0;

    /// Ball count limits (one level per ball count)
    pub const BALL_MIN: usize = 1;
    pub const BALL_MAX: usize = 20;

    /// Number of distinct ball appearances
    pub const BALL_KINDS: u8 = 24;

    /// Captured percentage required to clear a level
    pub const PROGRESS_GOAL: u32 = 75;

    /// Timed mode clock budget
    pub const TIMED_BASE_SECONDS: u64 = 60;
    pub const TIMED_SECONDS_PER_BALL: u64 = 15;
}

/// Convert a tick count to milliseconds
#[inline]
pub fn ticks_to_millis(ticks: u64) -> u64 {
    ticks * 1000 / consts::TICKS_PER_SECOND
}

/// Format milliseconds as `mm:ss.SSS`
pub fn format_millis(millis: u64) -> String {
    let minutes = millis / 60_000;
    let seconds = (millis / 1000) % 60;
    let ms = millis % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, ms)
}
