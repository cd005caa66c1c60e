//! Scene configuration
//!
//! Loaded from JSON. Every field has a default, so `{}` is a valid config
//! describing the two-ball reference table.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::renderer::Color;
use crate::sim::{Ball, Scene, SimParams};

/// Initial state of one ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    #[serde(default = "default_color")]
    pub color: Color,
}

fn default_radius() -> f32 {
    BALL_RADIUS
}

fn default_mass() -> f32 {
    BALL_MASS
}

fn default_color() -> Color {
    Color::WHITE
}

impl BallSpec {
    pub fn to_ball(&self) -> Ball {
        Ball::new(self.position, self.radius, self.mass, self.color).with_velocity(self.velocity)
    }
}

/// Seeded random balls appended after the explicit ones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterSpec {
    pub seed: u64,
    pub count: usize,
    /// Inclusive `[min, max]` radius
    pub radius: [f32; 2],
    /// Inclusive `[min, max]` initial speed
    pub speed: [f32; 2],
    /// Mass per squared radius unit
    pub density: f32,
}

impl Default for ScatterSpec {
    fn default() -> Self {
        Self {
            seed: 0,
            count: 0,
            radius: [4.0, 8.0],
            speed: [10.0, 60.0],
            density: BALL_MASS / (BALL_RADIUS * BALL_RADIUS),
        }
    }
}

/// Simulation and presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Framebuffer (and physics bounds) size in pixels
    pub width: u32,
    pub height: u32,

    /// Driver frame rate; the largest dt a step integrates is its inverse
    pub target_frame_rate: f32,
    /// Velocity decay constant, in `[0, 1)`
    pub damping: f32,
    /// Scale applied to the cue-to-pointer offset on launch
    pub launch_factor: f32,

    pub background: Color,
    /// Color of the aim line
    pub aim_color: Color,

    /// Index into `balls` of the launchable ball
    pub cue: usize,
    pub balls: Vec<BallSpec>,
    pub scatter: Option<ScatterSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        let reference = Scene::reference(BUFFER_WIDTH, BUFFER_HEIGHT);
        Self {
            width: BUFFER_WIDTH,
            height: BUFFER_HEIGHT,
            target_frame_rate: TARGET_FRAME_RATE,
            damping: DAMPING,
            launch_factor: LAUNCH_FACTOR,
            background: Color::BLACK,
            aim_color: Color::WHITE,
            cue: reference.cue,
            balls: reference
                .balls
                .iter()
                .map(|b| BallSpec {
                    position: b.pos,
                    velocity: b.vel,
                    radius: b.radius,
                    mass: b.mass,
                    color: b.color,
                })
                .collect(),
            scatter: None,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {}: {}x{}, {} balls",
            path.display(),
            settings.width,
            settings.height,
            settings.balls.len()
        );
        Ok(settings)
    }

    /// Largest dt a single step may integrate
    pub fn max_dt(&self) -> f32 {
        1.0 / self.target_frame_rate
    }

    pub fn sim_params(&self) -> SimParams {
        SimParams {
            damping: self.damping,
            launch_factor: self.launch_factor,
            max_dt: self.max_dt(),
        }
    }

    /// Reject configs describing scenes the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("buffer size {}x{} is empty", self.width, self.height));
        }
        if !(self.target_frame_rate > 0.0) {
            return invalid(format!(
                "target_frame_rate must be positive, got {}",
                self.target_frame_rate
            ));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return invalid(format!("damping must be in [0, 1), got {}", self.damping));
        }
        if !self.balls.is_empty() && self.cue >= self.balls.len() {
            return invalid(format!(
                "cue index {} out of range for {} balls",
                self.cue,
                self.balls.len()
            ));
        }

        let (w, h) = (self.width as f32, self.height as f32);
        for (i, ball) in self.balls.iter().enumerate() {
            if !(ball.radius > 0.0) || !(ball.mass > 0.0) {
                return invalid(format!("ball {i}: radius and mass must be positive"));
            }
            let p = ball.position;
            if p.x < ball.radius
                || p.y < ball.radius
                || p.x > w - ball.radius - 1.0
                || p.y > h - ball.radius - 1.0
            {
                return invalid(format!("ball {i} at {p:?} does not fit inside {w}x{h}"));
            }
        }

        if let Some(scatter) = &self.scatter {
            let [r_min, r_max] = scatter.radius;
            let [s_min, s_max] = scatter.speed;
            if !(r_min > 0.0) || r_min > r_max {
                return invalid(format!("scatter radius range {r_min}..{r_max} is invalid"));
            }
            if !(s_min >= 0.0) || s_min > s_max {
                return invalid(format!("scatter speed range {s_min}..{s_max} is invalid"));
            }
            if !(scatter.density > 0.0) {
                return invalid(format!("scatter density must be positive, got {}", scatter.density));
            }
        }

        Ok(())
    }

    /// Build the initial scene: explicit balls first, then scattered ones
    pub fn build_scene(&self) -> Result<Scene, ConfigError> {
        self.validate()?;

        let mut scene = Scene::new(Vec2::new(self.width as f32, self.height as f32));
        scene.params = self.sim_params();
        scene.cue = self.cue;
        scene.balls = self.balls.iter().map(BallSpec::to_ball).collect();

        if let Some(scatter) = &self.scatter {
            scene.scatter(
                scatter.seed,
                scatter.count,
                (scatter.radius[0], scatter.radius[1]),
                (scatter.speed[0], scatter.speed[1]),
                scatter.density,
            );
        }

        log::info!(
            "Built scene: {} balls, {}x{}, damping {}",
            scene.balls.len(),
            self.width,
            self.height,
            self.damping
        );
        Ok(scene)
    }
}
