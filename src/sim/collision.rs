//! Collision detection and response
//!
//! Two kinds of contact matter: a ball touching the wall that is still being
//! drawn (the player loses a life), and two balls touching inside the same
//! region (they trade velocities).

use glam::Vec2;

use super::ball::{Ball, Positioned};
use super::rect::Rect;

/// Check whether any integer pixel of a wall band lies within `radius` of
/// `center`.
///
/// The band is inclusive on all four edges: a wall drawn from `left` to
/// `right` occupies every column in `left..=right`. Only the part of the band
/// overlapping the ball's bounding box is scanned.
pub fn wall_hits_ball(wall: &Rect, center: Vec2, radius: f32) -> bool {
    if wall.left > wall.right || wall.top > wall.bottom {
        return false;
    }

    let x_lo = wall.left.max((center.x - radius).floor() as i32);
    let x_hi = wall.right.min((center.x + radius).ceil() as i32);
    let y_lo = wall.top.max((center.y - radius).floor() as i32);
    let y_hi = wall.bottom.min((center.y + radius).ceil() as i32);
    if x_lo > x_hi || y_lo > y_hi {
        return false;
    }

    let r2 = radius * radius;
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let d = Vec2::new(x as f32, y as f32) - center;
            if d.length_squared() <= r2 {
                return true;
            }
        }
    }
    false
}

/// Find the nearest ball overlapping `balls[index]` in the same region
pub fn collision_partner(balls: &[Ball], index: usize) -> Option<usize> {
    let ball = &balls[index];
    balls
        .iter()
        .enumerate()
        .filter(|(i, other)| *i != index && other.id != ball.id)
        .filter(|(_, other)| other.region == ball.region)
        .filter(|(_, other)| ball.overlaps(other))
        .min_by(|(_, a), (_, b)| {
            ball.distance_to(*a)
                .partial_cmp(&ball.distance_to(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

/// Swap the velocity vectors of two balls and move both along their new
/// heading so they separate.
pub fn exchange_velocities(balls: &mut [Ball], a: usize, b: usize) {
    let va = balls[a].vel;
    let vb = balls[b].vel;
    balls[a].vel = vb;
    balls[b].vel = va;
    balls[a].advance();
    balls[b].advance();
}
