//! Software rendering module
//!
//! Everything is drawn on the CPU into a [`Framebuffer`]; presenting that
//! buffer is left to the platform layer.

pub mod color;
pub mod framebuffer;
pub mod raster;

pub use color::Color;
pub use framebuffer::{Framebuffer, Layout, PixelFormat};
pub use raster::{circle_octant, draw_circle, draw_line};

use glam::Vec2;

use crate::sim::Scene;

/// Colors used by a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub background: Color,
    /// Color of the cue-to-pointer aim line
    pub aim: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            aim: Color::WHITE,
        }
    }
}

/// Clear to black and draw every ball outline in scene order
pub fn render(fb: &mut Framebuffer, scene: &Scene) {
    render_with(fb, scene, &RenderStyle::default(), None);
}

/// Full render pass.
///
/// Balls are drawn in scene order, so later balls overwrite earlier ones
/// where outlines cross. When `aim` is set, a line from the cue ball to the
/// aim point is drawn last.
pub fn render_with(fb: &mut Framebuffer, scene: &Scene, style: &RenderStyle, aim: Option<Vec2>) {
    fb.clear(style.background);

    for ball in &scene.balls {
        draw_circle(fb, ball.pos, ball.radius, ball.color);
    }

    if let (Some(target), Some(cue)) = (aim, scene.cue_ball()) {
        draw_line(fb, cue.pos, target, style.aim);
    }
}
