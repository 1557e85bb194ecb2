//! A single bouncing ball

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::region::RegionId;

/// Appearance of a ball. Has no effect on physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallKind(pub u8);

/// Anything with a centre and a square footprint
pub trait Positioned {
    fn position(&self) -> Vec2;
    fn dimension(&self) -> f32;

    fn radius(&self) -> f32 {
        self.dimension() / 2.0
    }

    fn distance_to(&self, other: &impl Positioned) -> f32 {
        self.position().distance(other.position())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub kind: BallKind,
    /// Centre of the ball
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Width and height of the ball's square footprint
    pub dimension: f32,
    /// Region the ball is confined to
    pub region: RegionId,
}

impl Positioned for Ball {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn dimension(&self) -> f32 {
        self.dimension
    }
}

impl Ball {
    pub fn new(id: u32, kind: BallKind, dimension: f32, region: RegionId) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            dimension,
            region,
        }
    }

    /// Range of legal centre positions inside `rect`, as (min, max) corners.
    ///
    /// When the rectangle is narrower than the ball on an axis, both bounds
    /// collapse onto the rectangle's centre line.
    pub fn inset_bounds(&self, rect: &Rect) -> (Vec2, Vec2) {
        let half = self.dimension / 2.0;
        let center = rect.center();
        let mut min = Vec2::new(rect.left as f32 + half, rect.top as f32 + half);
        let mut max = Vec2::new(rect.right as f32 - half, rect.bottom as f32 - half);
        if min.x > max.x {
            min.x = center.x;
            max.x = center.x;
        }
        if min.y > max.y {
            min.y = center.y;
            max.y = center.y;
        }
        (min, max)
    }

    /// Pull the centre inside `rect` without touching velocity
    pub fn clamp_into(&mut self, rect: &Rect) {
        let (min, max) = self.inset_bounds(rect);
        self.pos = self.pos.clamp(min, max);
    }

    /// Move one tick inside `rect`, bouncing off its inset walls.
    ///
    /// Each axis reflects at most once: if the next position would cross the
    /// inset boundary in the direction of travel, the velocity component is
    /// negated and the position clamped to the boundary.
    pub fn step_within(&mut self, rect: &Rect) {
        self.clamp_into(rect);
        let (min, max) = self.inset_bounds(rect);

        let (x, vx) = step_axis(self.pos.x, self.vel.x, min.x, max.x);
        let (y, vy) = step_axis(self.pos.y, self.vel.y, min.y, max.y);
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::new(vx, vy);
    }

    /// Advance by velocity with no bounds check
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Circle overlap test using `dimension` as the contact distance
    pub fn overlaps(&self, other: &Ball) -> bool {
        self.distance_to(other) < self.dimension
    }
}

fn step_axis(pos: f32, vel: f32, min: f32, max: f32) -> (f32, f32) {
    let next = pos + vel;
    if vel > 0.0 && next > max {
        (max, -vel)
    } else if vel < 0.0 && next < min {
        (min, -vel)
    } else {
        (next, vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut ball = Ball::new(1, BallKind(0), 32.0, RegionId(0));
        ball.pos = Vec2::new(x, y);
        ball.vel = Vec2::new(vx, vy);
        ball
    }

    #[test]
    fn test_reflect_right_wall() {
        let rect = Rect::new(0, 0, 200, 200);
        let mut ball = ball_at(200.0 - 16.0 - 0.5, 100.0, 4.0, 0.0);
        ball.step_within(&rect);
        assert_eq!(ball.vel, Vec2::new(-4.0, 0.0));
        assert_eq!(ball.pos.x, 184.0);
        assert_eq!(ball.pos.y, 100.0);
    }

    #[test]
    fn test_reflect_top_left_corner() {
        let rect = Rect::new(0, 0, 200, 200);
        let mut ball = ball_at(17.0, 17.0, -3.0, -3.0);
        ball.step_within(&rect);
        assert_eq!(ball.vel, Vec2::new(3.0, 3.0));
        assert_eq!(ball.pos, Vec2::new(16.0, 16.0));
    }

    #[test]
    fn test_free_flight() {
        let rect = Rect::new(0, 0, 200, 200);
        let mut ball = ball_at(100.0, 100.0, 2.5, -1.5);
        ball.step_within(&rect);
        assert_eq!(ball.pos, Vec2::new(102.5, 98.5));
        assert_eq!(ball.vel, Vec2::new(2.5, -1.5));
    }

    #[test]
    fn test_moving_away_from_wall_does_not_reflect() {
        let rect = Rect::new(0, 0, 200, 200);
        let mut ball = ball_at(184.0, 100.0, -4.0, 0.0);
        ball.step_within(&rect);
        assert_eq!(ball.vel.x, -4.0);
        assert_eq!(ball.pos.x, 180.0);
    }

    #[test]
    fn test_narrow_region_centres_ball() {
        let rect = Rect::new(0, 0, 10, 200);
        let mut ball = ball_at(30.0, 50.0, 3.0, 0.0);
        ball.clamp_into(&rect);
        assert_eq!(ball.pos.x, 5.0);
    }

    #[test]
    fn test_overlap_uses_dimension() {
        let a = ball_at(100.0, 100.0, 0.0, 0.0);
        let b = ball_at(131.0, 100.0, 0.0, 0.0);
        let c = ball_at(132.0, 100.0, 0.0, 0.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
