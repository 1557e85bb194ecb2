//! Fixed timestep simulation tick
//!
//! One tick: handle input, advance the wall, run the player clock, then move
//! the balls. Everything observable comes back as a list of [`GameEvent`]s.

use glam::IVec2;
use rand::Rng;

use super::rect::{Axis, Rect};
use super::region::{DrawRejected, WallOutcome};
use super::state::{GameEvent, GamePhase, GameState, Swipe};

/// Minimum distance from a ball (in ball dimensions) for an autopilot wall
const AUTOPILOT_CLEARANCE: f32 = 1.5;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Swipe gesture to start a wall
    pub swipe: Option<Swipe>,
    /// Abandon the wall in progress
    pub cancel: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the simulation draws its own walls
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }
    state.time_ticks += 1;

    if input.cancel && state.regions.cancel_draw() {
        events.push(GameEvent::WallCancelled);
    }

    let mut input = input.clone();
    if input.autopilot && input.swipe.is_none() {
        input.swipe = autopilot_swipe(state);
    }
    if let Some(swipe) = input.swipe {
        handle_swipe(state, &swipe, &mut events);
    }

    match state.regions.update(state.balls.balls_mut()) {
        WallOutcome::Completed { .. } => {
            let progress = state.progress();
            events.push(GameEvent::WallCompleted { progress });
            if progress >= state.goal {
                let time_ms = state.player.score_millis();
                log::info!(
                    "Level {} won with {}% in {}",
                    state.player.level,
                    progress,
                    crate::format_millis(state.player.elapsed_millis())
                );
                state.phase = GamePhase::Won;
                events.push(GameEvent::LevelWon {
                    level: state.player.level,
                    time_ms,
                });
                return events;
            }
        }
        WallOutcome::Failed { .. } => {
            let lives_remaining = state.player.lose_life();
            events.push(GameEvent::WallFailed { lives_remaining });
            if lives_remaining == 0 {
                log::info!("Out of lives on level {}", state.player.level);
                state.phase = GamePhase::GameOver;
                events.push(GameEvent::GameOver);
                return events;
            }
        }
        WallOutcome::Idle | WallOutcome::Growing => {}
    }

    if state.player.update() {
        log::info!("Time expired on level {}", state.player.level);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::TimeExpired);
        events.push(GameEvent::GameOver);
        return events;
    }

    state.balls.update(&state.regions);
    events
}

/// Strictly inside the playfield (touches on the border are ignored)
fn inside_border(field: &Rect, p: IVec2) -> bool {
    p.x > field.left && p.x < field.right && p.y > field.top && p.y < field.bottom
}

fn handle_swipe(state: &mut GameState, swipe: &Swipe, events: &mut Vec<GameEvent>) {
    if state.regions.is_drawing() {
        return;
    }
    let field = state.regions.playfield();
    if !inside_border(&field, swipe.start) || !inside_border(&field, swipe.end) {
        return;
    }
    let Some(velocity) = state.player.wall_velocity(swipe) else {
        return;
    };

    if state.regions.region_at(swipe.start) != state.regions.region_at(swipe.end) {
        events.push(GameEvent::DrawRejected(DrawRejected::CrossesRegions));
        return;
    }

    match state.regions.start_draw(swipe.start, velocity) {
        Ok(region) => events.push(GameEvent::WallStarted { region }),
        Err(reason) => {
            log::debug!("Swipe {:?} rejected: {}", swipe, reason);
            events.push(GameEvent::DrawRejected(reason));
        }
    }
}

/// Pick a wall for demo mode: cut the largest open region across its longer
/// side, away from the balls living there.
fn autopilot_swipe(state: &mut GameState) -> Option<Swipe> {
    if state.regions.is_drawing() {
        return None;
    }

    let (id, rect) = state
        .regions
        .regions()
        .filter(|r| !r.solid)
        .max_by_key(|r| r.rect.area())
        .map(|r| (r.id, r.rect))?;

    let dimension = state.balls.config().dimension;
    let margin = dimension.ceil() as i32;
    let axis = if rect.width() >= rect.height() {
        Axis::Vertical
    } else {
        Axis::Horizontal
    };
    let (lo, hi) = match axis {
        Axis::Vertical => (rect.left, rect.right),
        Axis::Horizontal => (rect.top, rect.bottom),
    };
    if hi - lo <= 2 * margin {
        return None;
    }
    let at = state.rng.random_range(lo + margin..hi - margin);

    // Close balls must be heading away, and even then not too close
    let clearance = dimension * AUTOPILOT_CLEARANCE;
    let safe = state
        .balls
        .balls()
        .iter()
        .filter(|b| b.region == id)
        .all(|b| {
            let (pos, vel) = match axis {
                Axis::Vertical => (b.pos.x, b.vel.x),
                Axis::Horizontal => (b.pos.y, b.vel.y),
            };
            let offset = pos - at as f32;
            let receding = offset * vel > 0.0;
            offset.abs() > clearance * 4.0 || (offset.abs() > clearance && receding)
        });
    if !safe {
        return None;
    }

    let center = rect.center();
    let (cx, cy) = (center.x as i32, center.y as i32);
    Some(match axis {
        Axis::Vertical => Swipe::new(IVec2::new(at, cy), IVec2::new(at, cy + 1)),
        Axis::Horizontal => Swipe::new(IVec2::new(cx, at), IVec2::new(cx + 1, at)),
    })
}
