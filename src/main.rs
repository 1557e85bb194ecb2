//! Jezzin entry point
//!
//! Runs a headless demo session: the autopilot draws walls level after level
//! until it runs out of lives or time.
//!
//! Usage: `jezzin [seed] [max_seconds] [mode] [difficulty]`
//!
//! Settings and best times are only read and written when `JEZZIN_DATA_DIR`
//! names a directory.

use std::time::{SystemTime, UNIX_EPOCH};

use jezzin::consts::*;
use jezzin::persistence::{self, DATA_DIR_VAR};
use jezzin::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use jezzin::{Difficulty, GameMode, ScoreCard, Settings, format_millis};

const SETTINGS_FILE: &str = "settings.json";
const SCORES_FILE: &str = "scores.json";

/// Default cap on simulated time (10 minutes)
const DEFAULT_MAX_SECONDS: u64 = 600;

fn main() {
    env_logger::init();
    log::info!("Jezzin (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
    let max_seconds = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_SECONDS);

    let data_dir = persistence::data_dir();
    if data_dir.is_none() {
        log::info!("{} not set, settings and best times are not persisted", DATA_DIR_VAR);
    }

    let mut settings = match &data_dir {
        Some(dir) => Settings::load(&dir.join(SETTINGS_FILE)),
        None => Settings::default(),
    };
    if let Some(arg) = args.next() {
        match GameMode::from_str(&arg) {
            Some(mode) => settings.mode = mode,
            None => log::warn!("Unknown mode '{}', using {}", arg, settings.mode.as_str()),
        }
    }
    if let Some(arg) = args.next() {
        match Difficulty::from_str(&arg) {
            Some(difficulty) => settings.difficulty = difficulty,
            None => log::warn!(
                "Unknown difficulty '{}', using {}",
                arg,
                settings.difficulty.as_str()
            ),
        }
    }

    let mut scores = match &data_dir {
        Some(dir) => ScoreCard::load(&dir.join(SCORES_FILE)),
        None => ScoreCard::new(),
    };
    let mut state = GameState::new(seed, &settings);
    log::info!("Seed {}", seed);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let max_ticks = max_seconds * TICKS_PER_SECOND;

    for _ in 0..max_ticks {
        for event in tick(&mut state, &input) {
            match event {
                GameEvent::WallCompleted { progress } => {
                    log::info!("Wall completed, {}% captured", progress);
                }
                GameEvent::WallFailed { lives_remaining } => {
                    log::info!("Wall broken, {} lives left", lives_remaining);
                }
                GameEvent::LevelWon { level, time_ms } => {
                    let key = state.score_key();
                    if scores.record(key, time_ms) {
                        log::info!("New best for level {}: {}", level, format_millis(time_ms));
                    }
                }
                other => log::debug!("{:?}", other),
            }
        }

        match state.phase {
            GamePhase::Won if state.player.level < BALL_MAX as u32 => state.next_level(),
            GamePhase::Won | GamePhase::GameOver => break,
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }

    println!(
        "Seed {}: {} {} reached level {} with {}% captured ({:?})",
        seed,
        settings.mode.as_str(),
        settings.difficulty.as_str(),
        state.player.level,
        state.progress(),
        state.phase
    );

    if let Some(dir) = data_dir {
        if let Err(e) = settings.save(&dir.join(SETTINGS_FILE)) {
            log::warn!("Could not save settings: {}", e);
        }
        if let Err(e) = scores.save(&dir.join(SCORES_FILE)) {
            log::warn!("Could not save best times: {}", e);
        }
    }
}
