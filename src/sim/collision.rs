//! Collision detection and response for circular bodies
//!
//! Ball-ball contacts are found by sweeping the moving ball's center along
//! its displacement for the step (a ray against a circle of radius
//! `r_a + r_b`), so fast balls cannot tunnel through each other. Response is
//! a frictionless elastic impulse along the contact normal.

use glam::Vec2;

use super::state::Ball;
use crate::math::normalize;

/// First contact found for a moving ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the ball that was hit
    pub partner: usize,
    /// Distance travelled along the displacement before touching
    pub distance: f32,
}

/// Distance `a` can travel along `movement` before touching `b`, if the
/// contact happens within this step.
///
/// A stationary `a` never reports a contact. A `b` behind the direction of
/// travel is ignored, which also lets separating balls drift apart.
pub fn swept_contact(a: &Ball, movement: Vec2, b: &Ball) -> Option<f32> {
    let move_mag = movement.length();
    if move_mag == 0.0 {
        return None;
    }

    let c = b.pos - a.pos;
    let sum_radii = a.radius + b.radius;

    // Too far away to reach this step
    if move_mag < c.length() - sum_radii {
        return None;
    }

    let dir = normalize(movement);
    let d = dir.dot(c);
    if d <= 0.0 {
        return None;
    }

    // Squared distance from b's center to the line of travel
    let f = c.length_squared() - d * d;
    let sum_radii_sq = sum_radii * sum_radii;
    if f >= sum_radii_sq {
        return None;
    }

    let distance = d - (sum_radii_sq - f).sqrt();
    if move_mag < distance {
        return None;
    }

    Some(distance)
}

/// Scan `balls` in order for the first ball that `balls[index]` would hit
/// while moving by `movement`.
///
/// Only the first match is reported; simultaneous contacts with several
/// balls are resolved one per step, in scene order.
pub fn first_contact(balls: &[Ball], index: usize, movement: Vec2) -> Option<Contact> {
    let mover = &balls[index];
    balls
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .find_map(|(j, other)| {
            swept_contact(mover, movement, other).map(|distance| Contact {
                partner: j,
                distance,
            })
        })
}

/// Exchange momentum along the line of centers.
///
/// 1-D elastic collision on the normal; tangential velocity is untouched.
/// Returns the unit normal used (pointing from `b` to `a`), or `None` when
/// the centers coincide and no normal exists.
pub fn resolve_elastic(a: &mut Ball, b: &mut Ball) -> Option<Vec2> {
    let sep = a.pos - b.pos;
    if sep.length_squared() == 0.0 {
        return None;
    }
    let n = normalize(sep);

    let a1 = a.vel.dot(n);
    let a2 = b.vel.dot(n);
    let impulse = 2.0 * (a1 - a2) / (a.mass + b.mass);

    a.vel -= n * impulse * b.mass;
    b.vel += n * impulse * a.mass;
    Some(n)
}

/// Clamp a ball inside `[radius, bound - radius - 1]` on each axis,
/// negating the velocity component of every axis it had to clamp.
///
/// Axes are independent, so a corner hit reflects both. Returns whether
/// any wall was hit.
pub fn reflect_bounds(ball: &mut Ball, bounds: Vec2) -> bool {
    let mut hit = false;
    for axis in 0..2 {
        let upper = bounds[axis] - ball.radius - 1.0;
        if ball.pos[axis] > upper {
            ball.pos[axis] = upper;
            ball.vel[axis] = -ball.vel[axis];
            hit = true;
        }
        if ball.pos[axis] < ball.radius {
            ball.pos[axis] = ball.radius;
            ball.vel[axis] = -ball.vel[axis];
            hit = true;
        }
    }
    hit
}

/// Two distinct mutable balls out of one slice
pub fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    assert_ne!(i, j, "pair_mut needs two distinct indices");
    if i < j {
        let (lo, hi) = balls.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = balls.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
