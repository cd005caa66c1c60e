//! Simulation state: balls and the scene that owns them

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::renderer::Color;

/// A rigid circular body. No rotation; `acc` is recomputed every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Damping acceleration from the last step
    #[serde(default, skip_serializing)]
    pub acc: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub color: Color,
}

impl Ball {
    /// A ball at rest. `radius` and `mass` must be positive.
    pub fn new(pos: Vec2, radius: f32, mass: f32, color: Color) -> Self {
        debug_assert!(radius > 0.0 && mass > 0.0);
        Self {
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            radius,
            mass,
            color,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Whether the two discs overlap (touching counts as not overlapping)
    pub fn overlaps(&self, other: &Ball) -> bool {
        (other.pos - self.pos).length() < self.radius + other.radius
    }
}

/// Tunables that travel with a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Velocity decay constant `k`: each step adds `-k * vel * dt`
    pub damping: f32,
    /// Scale applied to the cue-to-pointer offset on launch
    pub launch_factor: f32,
    /// Upper bound for a single step's dt
    pub max_dt: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            damping: DAMPING,
            launch_factor: LAUNCH_FACTOR,
            max_dt: MAX_DT,
        }
    }
}

/// Ordered set of balls inside an axis-aligned `[0, bounds]` box.
///
/// Order is significant: it is the collision scan order and the draw order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub balls: Vec<Ball>,
    /// Width and height of the containing area
    pub bounds: Vec2,
    /// Index of the ball the pointer launches
    pub cue: usize,
    pub params: SimParams,
}

impl Scene {
    /// Empty scene with default parameters
    pub fn new(bounds: Vec2) -> Self {
        Self {
            balls: Vec::new(),
            bounds,
            cue: 0,
            params: SimParams::default(),
        }
    }

    /// Two-ball reference table: a red ball at the center and a green cue
    /// ball halfway between it and the left edge.
    pub fn reference(width: u32, height: u32) -> Self {
        let mut scene = Self::new(Vec2::new(width as f32, height as f32));
        let center_y = (height / 2) as f32;
        scene.balls.push(Ball::new(
            Vec2::new((width / 2) as f32, center_y),
            BALL_RADIUS,
            BALL_MASS,
            Color::RED,
        ));
        scene.balls.push(Ball::new(
            Vec2::new((width / 4) as f32, center_y),
            BALL_RADIUS,
            BALL_MASS,
            Color::GREEN,
        ));
        scene.cue = 1;
        log::info!(
            "Reference scene: {} balls in {}x{}",
            scene.balls.len(),
            width,
            height
        );
        scene
    }

    /// Append up to `count` non-overlapping balls with seeded random
    /// position, heading, speed and radius. Mass is `density * r²`.
    ///
    /// Returns how many balls were placed; placement gives up after a bounded
    /// number of rejected candidates.
    pub fn scatter(
        &mut self,
        seed: u64,
        count: usize,
        radius: (f32, f32),
        speed: (f32, f32),
        density: f32,
    ) -> usize {
        let mut rng = Pcg32::seed_from_u64(seed);
        let palette = Color::PALETTE;
        // Everything but black, which is the default background
        let colors = &palette[1..];
        let max_attempts = count.saturating_mul(100).max(100);

        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < max_attempts {
            attempts += 1;

            let r = rng.random_range(radius.0..=radius.1);
            let hi = self.bounds - Vec2::splat(r + 1.0);
            if hi.x < r || hi.y < r {
                continue;
            }
            let pos = Vec2::new(rng.random_range(r..=hi.x), rng.random_range(r..=hi.y));
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let s = rng.random_range(speed.0..=speed.1);
            let (_, color) = colors[self.balls.len() % colors.len()];

            let ball = Ball::new(pos, r, density * r * r, color)
                .with_velocity(Vec2::new(angle.cos(), angle.sin()) * s);

            // Touching is allowed, overlap is not
            if self.balls.iter().any(|b| b.overlaps(&ball)) {
                continue;
            }
            self.balls.push(ball);
            placed += 1;
        }

        if placed < count {
            log::warn!(
                "Scatter placed {placed}/{count} balls after {attempts} attempts (seed {seed})"
            );
        } else {
            log::info!("Scattered {placed} balls (seed {seed})");
        }
        placed
    }

    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.get(self.cue)
    }

    pub fn cue_ball_mut(&mut self) -> Option<&mut Ball> {
        self.balls.get_mut(self.cue)
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.balls.iter().map(Ball::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.balls.iter().map(Ball::kinetic_energy).sum()
    }

    /// Whether every ball has (almost) stopped
    pub fn at_rest(&self, speed_epsilon: f32) -> bool {
        self.balls.iter().all(|b| b.vel.length() <= speed_epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scene() {
        let scene = Scene::reference(BUFFER_WIDTH, BUFFER_HEIGHT);
        assert_eq!(scene.balls.len(), 2);
        assert_eq!(scene.balls[0].pos, Vec2::new(120.0, 67.0));
        assert_eq!(scene.balls[1].pos, Vec2::new(60.0, 67.0));
        assert_eq!(scene.balls[0].color, Color::RED);
        assert_eq!(scene.cue_ball().map(|b| b.color), Some(Color::GREEN));
        assert!(scene.at_rest(0.0));
    }

    #[test]
    fn test_diagnostics() {
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        scene.balls.push(
            Ball::new(Vec2::new(20.0, 20.0), 5.0, 2.0, Color::RED).with_velocity(Vec2::new(3.0, 0.0)),
        );
        scene.balls.push(
            Ball::new(Vec2::new(60.0, 60.0), 5.0, 1.0, Color::BLUE)
                .with_velocity(Vec2::new(0.0, -4.0)),
        );

        assert_eq!(scene.total_momentum(), Vec2::new(6.0, -4.0));
        assert!((scene.kinetic_energy() - (9.0 + 8.0)).abs() < 1e-5);
        assert!(!scene.at_rest(1.0));
    }

    #[test]
    fn test_scatter_is_deterministic_and_non_overlapping() {
        let mut a = Scene::new(Vec2::new(240.0, 135.0));
        let mut b = Scene::new(Vec2::new(240.0, 135.0));
        let placed = a.scatter(42, 12, (3.0, 6.0), (10.0, 40.0), 0.1);
        b.scatter(42, 12, (3.0, 6.0), (10.0, 40.0), 0.1);

        assert_eq!(placed, 12);
        assert_eq!(a.balls, b.balls);
        for (i, ball) in a.balls.iter().enumerate() {
            assert!(ball.pos.x >= ball.radius && ball.pos.x <= 240.0 - ball.radius - 1.0);
            assert!(ball.pos.y >= ball.radius && ball.pos.y <= 135.0 - ball.radius - 1.0);
            let speed = ball.vel.length();
            assert!((10.0 - 1e-3..=40.0 + 1e-3).contains(&speed));
            for other in &a.balls[i + 1..] {
                assert!(!ball.overlaps(other));
            }
        }
    }

    #[test]
    fn test_scatter_gives_up_when_full() {
        let mut scene = Scene::new(Vec2::new(30.0, 30.0));
        let placed = scene.scatter(7, 50, (10.0, 10.0), (0.0, 0.0), 0.1);
        assert!(placed < 50);
        assert_eq!(scene.balls.len(), placed);
    }

    #[test]
    fn test_scatter_skips_balls_larger_than_box() {
        let mut scene = Scene::new(Vec2::new(10.0, 10.0));
        assert_eq!(scene.scatter(1, 3, (20.0, 20.0), (1.0, 1.0), 1.0), 0);
    }
}
