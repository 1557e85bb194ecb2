//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (regions by id, balls by spawn order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod balls;
pub mod collision;
pub mod rect;
pub mod region;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallKind, Positioned};
pub use balls::{BallConfig, BallSet};
pub use collision::{collision_partner, exchange_velocities, wall_hits_ball};
pub use rect::{Axis, Rect};
pub use region::{DrawRejected, Region, RegionId, RegionSet, Wall, WallOutcome};
pub use state::{GameEvent, GamePhase, GameState, Player, Swipe};
pub use tick::{TickInput, tick};
