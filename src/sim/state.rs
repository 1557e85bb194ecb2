//! Game state and core simulation types
//!
//! Everything needed to replay a level deterministically lives here: the
//! regions, the balls, the player's lives and clock, and the seed.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::balls::{BallConfig, BallSet};
use super::rect::Rect;
use super::region::{DrawRejected, RegionId, RegionSet};
use crate::consts::*;
use crate::scorecard::ScoreKey;
use crate::settings::{Difficulty, GameMode, Settings};
use crate::ticks_to_millis;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Enough area captured; waiting for next level or restart
    Won,
    /// Out of lives or out of time
    GameOver,
}

/// Something that happened during a tick, for the UI/audio layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WallStarted { region: RegionId },
    DrawRejected(DrawRejected),
    WallCancelled,
    /// Wall finished; `progress` is the captured percentage afterwards
    WallCompleted { progress: u32 },
    /// A ball hit the wall
    WallFailed { lives_remaining: u32 },
    /// `time_ms` is the score time for the mode (elapsed, or remaining when timed)
    LevelWon { level: u32, time_ms: u64 },
    TimeExpired,
    GameOver,
}

/// A swipe gesture in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swipe {
    pub start: IVec2,
    pub end: IVec2,
}

impl Swipe {
    pub fn new(start: IVec2, end: IVec2) -> Self {
        Self { start, end }
    }
}

/// Per-level player state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub lives: u32,
    pub level: u32,
    /// Ticks played this level
    pub elapsed_ticks: u64,
    /// Countdown budget (timed mode only)
    pub time_limit_ticks: Option<u64>,
    /// Pixels each wall end advances per tick
    pub wall_speed: i32,
}

impl Player {
    pub fn new(level: u32, lives: u32, wall_speed: i32, time_limit_ticks: Option<u64>) -> Self {
        Self {
            lives,
            level,
            elapsed_ticks: 0,
            time_limit_ticks,
            wall_speed,
        }
    }

    /// Take away one life (never below zero). Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    /// Advance the clock one tick. Returns true once the time limit runs out.
    pub fn update(&mut self) -> bool {
        self.elapsed_ticks += 1;
        self.time_limit_ticks.is_some_and(|limit| self.elapsed_ticks >= limit)
    }

    pub fn remaining_ticks(&self) -> Option<u64> {
        self.time_limit_ticks
            .map(|limit| limit.saturating_sub(self.elapsed_ticks))
    }

    pub fn elapsed_millis(&self) -> u64 {
        ticks_to_millis(self.elapsed_ticks)
    }

    /// Time the score card ranks: remaining time with a clock, elapsed without
    pub fn score_millis(&self) -> u64 {
        match self.remaining_ticks() {
            Some(remaining) => ticks_to_millis(remaining),
            None => self.elapsed_millis(),
        }
    }

    /// Wall velocity for a swipe: along the dominant axis, none on a tie
    pub fn wall_velocity(&self, swipe: &Swipe) -> Option<IVec2> {
        let diff = (swipe.end - swipe.start).abs();
        if diff.x > diff.y {
            Some(IVec2::new(self.wall_speed, 0))
        } else if diff.y > diff.x {
            Some(IVec2::new(0, self.wall_speed))
        } else {
            None
        }
    }
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Captured percentage that clears a level
    pub goal: u32,
    /// Simulation tick counter (unpaused ticks)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub regions: RegionSet,
    pub balls: BallSet,
    /// Autopilot choices
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// New game on the standard playfield
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self::with_playfield(
            seed,
            settings,
            Rect::from_xywh(0, 0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
        )
    }

    pub fn with_playfield(seed: u64, settings: &Settings, playfield: Rect) -> Self {
        let config = BallConfig {
            collision: settings.collision,
            ..BallConfig::default()
        };
        let mut state = Self {
            seed,
            mode: settings.mode,
            difficulty: settings.difficulty,
            goal: PROGRESS_GOAL,
            time_ticks: 0,
            phase: GamePhase::Playing,
            player: Player::new(0, 0, settings.difficulty.wall_speed(), None),
            regions: RegionSet::new(playfield),
            balls: BallSet::new(config, seed),
            rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
        };
        state.start_level(settings.effective_level());
        state
    }

    /// Reset the playfield and spawn `level` balls
    pub fn start_level(&mut self, level: u32) {
        let level = level.clamp(BALL_MIN as u32, BALL_MAX as u32);
        self.regions.reset();
        self.balls.reset(level as usize, &self.regions);
        self.regions.reassign(self.balls.balls_mut());

        let count = self.balls.len();
        self.player = Player::new(
            level,
            self.mode.starting_lives(count),
            self.difficulty.wall_speed(),
            self.mode.time_limit_ticks(count),
        );
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} ({} {}, {} lives)",
            level,
            self.mode.as_str(),
            self.difficulty.as_str(),
            self.player.lives
        );
    }

    /// Advance to the next level (one more ball), capped at the last level
    pub fn next_level(&mut self) {
        self.start_level((self.player.level + 1).min(BALL_MAX as u32));
    }

    /// Replay the current level from scratch
    pub fn restart(&mut self) {
        self.start_level(self.player.level);
    }

    /// Captured percentage of the playfield
    pub fn progress(&self) -> u32 {
        self.regions.total_progress()
    }

    pub fn score_key(&self) -> ScoreKey {
        ScoreKey {
            mode: self.mode,
            difficulty: self.difficulty,
            level: self.player.level,
        }
    }
}
