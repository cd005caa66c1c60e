//! Pool - software-rendered 2D ball simulation
//!
//! Core modules:
//! - `math`: Vector and 2x2 matrix primitives
//! - `renderer`: Framebuffer and integer rasterizer (circles, lines)
//! - `sim`: Motion, swept ball-ball collisions, boundary reflection
//! - `platform`: Frame clock, pointer mapping and framebuffer presentation helpers
//! - `settings`: Data-driven scene configuration

pub mod error;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use renderer::{Color, Framebuffer};
pub use settings::Settings;
pub use sim::{Ball, Scene};

/// Reference configuration constants
pub mod consts {
    /// Frame rate the driver targets; also bounds the integration step
    pub const TARGET_FRAME_RATE: f32 = 60.0;
    /// Largest dt a single step may integrate
    pub const MAX_DT: f32 = 1.0 / TARGET_FRAME_RATE;

    /// Velocity decay constant (acceleration = -DAMPING * velocity)
    pub const DAMPING: f32 = 0.9999;
    /// Scale applied to the cue-to-pointer offset when firing
    pub const LAUNCH_FACTOR: f32 = 3.0;

    /// Window dimensions of the reference driver
    pub const WINDOW_WIDTH: u32 = 1920 / 2;
    pub const WINDOW_HEIGHT: u32 = 1080 / 2;
    /// The framebuffer is a quarter of the window on each axis
    pub const BUFFER_WIDTH: u32 = WINDOW_WIDTH / 4;
    pub const BUFFER_HEIGHT: u32 = WINDOW_HEIGHT / 4;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_MASS: f32 = 10.0;
}

/// Clamp a raw frame gap into `[0, max_dt]`.
///
/// Large gaps (debugger pauses, scheduler hiccups) would otherwise let a
/// ball tunnel through walls in a single step.
#[inline]
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, max_dt)
}
