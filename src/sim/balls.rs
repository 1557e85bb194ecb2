//! The set of balls in play
//!
//! Spawning picks random, non-overlapping positions and random velocities from
//! a seeded RNG. Each tick a ball may trade velocity with one touching
//! neighbour in its region, then bounces inside its region's walls.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallKind};
use super::collision::{collision_partner, exchange_velocities};
use super::rect::Rect;
use super::region::{RegionId, RegionSet};
use crate::consts::*;

/// Placement retries per ball before accepting an overlapping position
const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Ball tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallConfig {
    /// Width/height of a ball
    pub dimension: f32,
    /// Per-axis speed range (pixels per tick)
    pub velocity_min: f32,
    pub velocity_max: f32,
    /// Allowed ball counts; requests outside are clamped
    pub min_count: usize,
    pub max_count: usize,
    /// Balls bounce off each other
    pub collision: bool,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            dimension: BALL_DIMENSION,
            velocity_min: VELOCITY_MIN,
            velocity_max: VELOCITY_MAX,
            min_count: BALL_MIN,
            max_count: BALL_MAX,
            collision: true,
        }
    }
}

/// Every ball in play, plus the seeded RNG that spawns them
#[derive(Debug, Clone)]
pub struct BallSet {
    config: BallConfig,
    balls: Vec<Ball>,
    rng: Pcg32,
    /// Appearances not yet handed out in the current cycle
    kind_bag: Vec<BallKind>,
    next_id: u32,
}

impl BallSet {
    pub fn new(config: BallConfig, seed: u64) -> Self {
        Self {
            config,
            balls: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            kind_bag: Vec::with_capacity(BALL_KINDS as usize),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &BallConfig {
        &self.config
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Replace all balls with `count` fresh ones scattered over the playfield.
    ///
    /// Expects `regions` to have just been reset, so every ball lands in the
    /// single initial region.
    pub fn reset(&mut self, count: usize, regions: &RegionSet) {
        let max = self.config.max_count.max(self.config.min_count);
        let count = count.clamp(self.config.min_count, max);
        let playfield = regions.playfield();

        self.balls.clear();
        self.refill_bag();

        for _ in 0..count {
            let kind = self.next_kind();
            let id = self.next_id;
            self.next_id += 1;

            let pos = self.random_position(&playfield);
            let Some(region) = home_region(regions, pos) else {
                log::warn!("No region at {} for ball {}, playfield {:?}", pos, id, playfield);
                continue;
            };
            let mut ball = Ball::new(id, kind, self.config.dimension, region);
            ball.pos = pos;
            ball.vel = self.random_velocity();

            if self.config.collision {
                let mut attempts = 0;
                while self
                    .balls
                    .iter()
                    .any(|other| other.region == ball.region && ball.overlaps(other))
                {
                    attempts += 1;
                    if attempts >= MAX_PLACEMENT_ATTEMPTS {
                        log::warn!("No free spot for ball {} after {} attempts", id, attempts);
                        break;
                    }
                    let pos = self.random_position(&playfield);
                    if let Some(region) = home_region(regions, pos) {
                        ball.pos = pos;
                        ball.region = region;
                    }
                }
            }

            self.balls.push(ball);
        }

        log::info!("Spawned {} balls (collision: {})", self.balls.len(), self.config.collision);
    }

    /// Advance every ball by one tick
    pub fn update(&mut self, regions: &RegionSet) {
        for i in 0..self.balls.len() {
            if self.config.collision {
                if let Some(j) = collision_partner(&self.balls, i) {
                    exchange_velocities(&mut self.balls, i, j);
                    if let Some(region) = regions.get(self.balls[j].region) {
                        self.balls[j].clamp_into(&region.rect);
                    }
                }
            }

            let ball = &mut self.balls[i];
            match regions.get(ball.region) {
                Some(region) => ball.step_within(&region.rect),
                None => {
                    log::warn!("Ball {} has no region {:?}, bouncing in playfield", ball.id, ball.region);
                    ball.step_within(&regions.playfield());
                }
            }
        }
    }

    fn refill_bag(&mut self) {
        self.kind_bag.clear();
        self.kind_bag.extend((0..BALL_KINDS).map(BallKind));
    }

    /// Draw an appearance without replacement, refilling once all are used
    fn next_kind(&mut self) -> BallKind {
        if self.kind_bag.is_empty() {
            self.refill_bag();
        }
        let index = self.rng.random_range(0..self.kind_bag.len());
        self.kind_bag.swap_remove(index)
    }

    fn random_position(&mut self, playfield: &Rect) -> Vec2 {
        let half = self.config.dimension / 2.0;
        let center = playfield.center();
        let x = random_in(&mut self.rng, playfield.left as f32 + half, playfield.right as f32 - half, center.x);
        let y = random_in(&mut self.rng, playfield.top as f32 + half, playfield.bottom as f32 - half, center.y);
        Vec2::new(x, y)
    }

    fn random_velocity(&mut self) -> Vec2 {
        let dx = self.random_speed();
        let dy = self.random_speed();
        Vec2::new(dx, dy)
    }

    /// Magnitude uniform in the configured range, sign 50/50
    fn random_speed(&mut self) -> f32 {
        let (min, max) = (self.config.velocity_min, self.config.velocity_max);
        let speed = random_in(&mut self.rng, min, max, min);
        if self.rng.random_bool(0.5) { -speed } else { speed }
    }
}

/// Uniform in `lo..=hi`, or `fallback` if the range is empty
fn random_in(rng: &mut Pcg32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if lo < hi { rng.random_range(lo..=hi) } else { fallback }
}

/// Region whose pixels contain `pos`
fn home_region(regions: &RegionSet, pos: Vec2) -> Option<RegionId> {
    regions.region_at(IVec2::new(pos.x.floor() as i32, pos.y.floor() as i32))
}
