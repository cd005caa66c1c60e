//! Per-frame simulation step
//!
//! Advances every ball in scene order: swept collision against the others,
//! move, damp, then clamp against the walls.

use glam::Vec2;

use super::collision::{first_contact, pair_mut, reflect_bounds, resolve_elastic};
use super::state::Scene;
use crate::clamp_dt;
use crate::math::normalize;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in buffer space
    pub aim: Option<Vec2>,
    /// Fire edge: launch the cue ball toward `aim` this frame
    pub fire: bool,
}

/// Advance the scene by `dt` seconds.
///
/// For each ball in order:
/// 1. Sweep its displacement `vel * dt` against every other ball; the first
///    ball in scene order that it would touch wins. On a hit the ball only
///    advances to the contact point and the pair exchanges momentum along
///    the normal. Otherwise it takes the full displacement.
/// 2. Damp: `acc = -k * vel`, `vel += acc * dt`.
/// 3. Reflect off the walls using the already-updated position and velocity.
///
/// Collision and wall corrections are applied in sequence, not reconciled: a
/// ball that is pushed into a wall by a collision is only clamped afterwards.
/// `dt` must be non-negative.
pub fn step(scene: &mut Scene, dt: f32) {
    let damping = scene.params.damping;
    let bounds = scene.bounds;

    for i in 0..scene.balls.len() {
        let movement = scene.balls[i].vel * dt;

        match first_contact(&scene.balls, i, movement) {
            Some(contact) => {
                let (ball, other) = pair_mut(&mut scene.balls, i, contact.partner);
                ball.pos += normalize(movement) * contact.distance;
                resolve_elastic(ball, other);
                log::debug!(
                    "Ball {} hit ball {} after {:.3} units; velocities now {:?} / {:?}",
                    i,
                    contact.partner,
                    contact.distance,
                    ball.vel,
                    other.vel
                );
            }
            None => scene.balls[i].pos += movement,
        }

        let ball = &mut scene.balls[i];
        ball.acc = ball.vel * -damping;
        ball.vel += ball.acc * dt;

        if reflect_bounds(ball, bounds) {
            log::trace!("Ball {} bounced at {:?}", i, ball.pos);
        }
    }
}

/// Set the cue ball's velocity toward `target`, scaled by the launch factor.
/// Returns false when the scene has no cue ball.
pub fn launch(scene: &mut Scene, target: Vec2) -> bool {
    let factor = scene.params.launch_factor;
    match scene.cue_ball_mut() {
        Some(cue) => {
            cue.vel = (target - cue.pos) * factor;
            log::info!("Launched cue ball toward {:?} at {:?}", target, cue.vel);
            true
        }
        None => {
            log::warn!("Launch ignored: no cue ball");
            false
        }
    }
}

/// Apply one frame of input, then step with `dt` clamped to the scene's
/// `max_dt`.
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) {
    if input.fire {
        if let Some(target) = input.aim {
            launch(scene, target);
        }
    }

    let clamped = clamp_dt(dt, scene.params.max_dt);
    if dt > clamped * 4.0 && clamped > 0.0 {
        log::warn!("Frame gap of {dt:.3}s clamped to {clamped:.4}s");
    }
    step(scene, clamped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::Color;
    use crate::sim::Ball;

    const DT: f32 = 1.0 / 60.0;

    fn undamped(mut scene: Scene) -> Scene {
        scene.params.damping = 0.0;
        scene
    }

    #[test]
    fn test_head_on_equal_masses_exchange_velocity() {
        let mut scene = Scene::new(Vec2::new(240.0, 135.0));
        scene
            .balls
            .push(Ball::new(Vec2::new(120.0, 67.0), 10.0, 10.0, Color::RED));
        scene.balls.push(
            Ball::new(Vec2::new(60.0, 67.0), 10.0, 10.0, Color::GREEN)
                .with_velocity(Vec2::new(50.0, 0.0)),
        );

        let mut collided_at = None;
        for frame in 0..600 {
            let incoming = scene.balls[1].vel;
            step(&mut scene, DT);

            let sep = (scene.balls[0].pos - scene.balls[1].pos).length();
            assert!(sep >= 20.0 - 1e-3, "interpenetration at frame {frame}: {sep}");

            if collided_at.is_none() && scene.balls[0].vel.x > 0.0 {
                collided_at = Some(frame);
                assert!(scene.balls[1].vel.length() < 1e-3);
                assert!((scene.balls[0].vel - incoming).length() < 1e-3);
                assert!((sep - 20.0).abs() < 1e-3);
            }
        }

        assert!(collided_at.is_some(), "moving ball never reached the target");
        // Target keeps moving away afterwards, striker stays put
        assert!(scene.balls[0].pos.x > 120.0);
        assert!(scene.balls[1].vel.length() < 1e-3);
    }

    #[test]
    fn test_collision_from_either_scene_order() {
        // Striker first in scene order this time
        let mut scene = undamped(Scene::new(Vec2::new(240.0, 135.0)));
        scene.balls.push(
            Ball::new(Vec2::new(60.0, 67.0), 10.0, 10.0, Color::GREEN)
                .with_velocity(Vec2::new(50.0, 0.0)),
        );
        scene
            .balls
            .push(Ball::new(Vec2::new(120.0, 67.0), 10.0, 10.0, Color::RED));

        for _ in 0..120 {
            step(&mut scene, DT);
            let sep = (scene.balls[0].pos - scene.balls[1].pos).length();
            assert!(sep >= 20.0 - 1e-3);
        }
        assert!(scene.balls[0].vel.length() < 1e-3);
        assert!((scene.balls[1].vel.x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_corner_reflects_both_axes_in_one_step() {
        let mut scene = undamped(Scene::new(Vec2::new(100.0, 100.0)));
        scene.balls.push(
            Ball::new(Vec2::new(93.5, 93.5), 5.0, 1.0, Color::WHITE)
                .with_velocity(Vec2::new(100.0, 100.0)),
        );

        step(&mut scene, DT);

        assert_eq!(scene.balls[0].pos, Vec2::new(94.0, 94.0));
        assert_eq!(scene.balls[0].vel, Vec2::new(-100.0, -100.0));
    }

    #[test]
    fn test_corner_reflection_with_damping() {
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        scene.balls.push(
            Ball::new(Vec2::new(93.5, 93.5), 5.0, 1.0, Color::WHITE)
                .with_velocity(Vec2::new(100.0, 100.0)),
        );

        step(&mut scene, DT);

        let expected = -100.0 * (1.0 - DAMPING * DT);
        assert_eq!(scene.balls[0].pos, Vec2::new(94.0, 94.0));
        assert!((scene.balls[0].vel.x - expected).abs() < 1e-3);
        assert!((scene.balls[0].vel.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_wall_reflection_at_radius() {
        let mut scene = undamped(Scene::new(Vec2::new(100.0, 100.0)));
        scene.balls.push(
            Ball::new(Vec2::new(5.0, 50.0), 5.0, 1.0, Color::WHITE)
                .with_velocity(Vec2::new(-30.0, 0.0)),
        );

        step(&mut scene, DT);

        assert_eq!(scene.balls[0].pos, Vec2::new(5.0, 50.0));
        assert_eq!(scene.balls[0].vel, Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_damping_brings_scene_to_rest() {
        let mut scene = Scene::new(Vec2::new(240.0, 135.0));
        scene.balls.push(
            Ball::new(Vec2::new(120.0, 67.0), 10.0, 10.0, Color::RED)
                .with_velocity(Vec2::new(80.0, -35.0)),
        );
        let start = scene.kinetic_energy();

        for _ in 0..60 {
            step(&mut scene, DT);
        }
        let after_one_second = scene.kinetic_energy();
        assert!(after_one_second < start * 0.2);

        for _ in 0..(60 * 20) {
            step(&mut scene, DT);
        }
        assert!(scene.at_rest(0.01));
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut scene = Scene::reference(BUFFER_WIDTH, BUFFER_HEIGHT);
        scene.balls[1].vel = Vec2::new(40.0, 10.0);
        let before = scene.balls.clone();
        step(&mut scene, 0.0);
        for (a, b) in before.iter().zip(&scene.balls) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.vel, b.vel);
        }
    }

    #[test]
    fn test_tick_fire_launches_cue_ball() {
        let mut scene = undamped(Scene::reference(BUFFER_WIDTH, BUFFER_HEIGHT));
        let input = TickInput {
            aim: Some(Vec2::new(70.0, 67.0)),
            fire: true,
        };

        tick(&mut scene, &input, DT);

        // (70 - 60) * 3 = 30 units/s toward the target
        assert!((scene.balls[1].vel - Vec2::new(30.0, 0.0)).length() < 1e-5);
        assert!((scene.balls[1].pos.x - (60.0 + 30.0 * DT)).abs() < 1e-4);
        assert_eq!(scene.balls[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_tick_without_fire_or_aim_does_not_launch() {
        let mut scene = Scene::reference(BUFFER_WIDTH, BUFFER_HEIGHT);
        let aim_only = TickInput {
            aim: Some(Vec2::new(200.0, 100.0)),
            fire: false,
        };
        tick(&mut scene, &aim_only, DT);
        let fire_only = TickInput {
            aim: None,
            fire: true,
        };
        tick(&mut scene, &fire_only, DT);
        assert!(scene.at_rest(0.0));
    }

    #[test]
    fn test_launch_without_cue_ball() {
        let mut scene = Scene::new(Vec2::new(50.0, 50.0));
        assert!(!launch(&mut scene, Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_tick_clamps_large_dt() {
        let mut scene = undamped(Scene::new(Vec2::new(240.0, 135.0)));
        scene.balls.push(
            Ball::new(Vec2::new(50.0, 50.0), 5.0, 1.0, Color::WHITE)
                .with_velocity(Vec2::new(60.0, 0.0)),
        );

        // A one-second hitch only integrates a single max_dt
        tick(&mut scene, &TickInput::default(), 1.0);
        assert!((scene.balls[0].pos.x - 51.0).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let mut a = Scene::new(Vec2::new(240.0, 135.0));
        a.scatter(99, 10, (3.0, 8.0), (20.0, 80.0), 0.1);
        let mut b = a.clone();

        for _ in 0..300 {
            step(&mut a, DT);
            step(&mut b, DT);
        }
        assert_eq!(a.balls, b.balls);
    }

    #[test]
    fn test_balls_stay_inside_bounds() {
        let mut scene = Scene::new(Vec2::new(240.0, 135.0));
        scene.scatter(5, 15, (3.0, 8.0), (50.0, 150.0), 0.1);

        for _ in 0..600 {
            step(&mut scene, DT);
            for ball in &scene.balls {
                assert!(ball.pos.x >= ball.radius && ball.pos.x <= 240.0 - ball.radius - 1.0);
                assert!(ball.pos.y >= ball.radius && ball.pos.y <= 135.0 - ball.radius - 1.0);
            }
        }
    }
}
