//! Platform abstraction layer
//!
//! The pieces of the scene loop driver that do not need a window and can be
//! tested on their own:
//! - Frame timing (dt acquisition and clamping)
//! - Pointer mapping from window space into buffer space
//! - Edge detection for the fire button
//! - Converting the bottom-up framebuffer into top-down RGBA for blitting

use glam::Vec2;

use crate::clamp_dt;
use crate::renderer::Framebuffer;

/// Turns monotonic timestamps into clamped per-frame dt values
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
    /// Unclamped gap measured by the last `tick`
    pub raw_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last: None,
            max_dt,
            raw_dt: 0.0,
        }
    }

    /// Feed the current time in seconds and get the dt to simulate.
    ///
    /// The first frame has no predecessor and simulates a full `max_dt`.
    pub fn tick(&mut self, now_secs: f64) -> f32 {
        let raw = match self.last {
            Some(last) => (now_secs - last) as f32,
            None => self.max_dt,
        };
        self.last = Some(now_secs);
        self.raw_dt = raw;
        clamp_dt(raw, self.max_dt)
    }
}

/// Map a pointer position in window client space (origin top-left, y down)
/// into buffer space (origin bottom-left, y up), clamped to the buffer.
pub fn map_pointer(client: Vec2, client_size: Vec2, buffer_width: u32, buffer_height: u32) -> Vec2 {
    let max = Vec2::new(
        buffer_width.saturating_sub(1) as f32,
        buffer_height.saturating_sub(1) as f32,
    );
    if client_size.x <= 0.0 || client_size.y <= 0.0 {
        return Vec2::ZERO;
    }

    let scale = Vec2::new(buffer_width as f32, buffer_height as f32) / client_size;
    let mapped = Vec2::new(client.x, client_size.y - client.y) * scale;
    mapped.clamp(Vec2::ZERO, max)
}

/// Reports only the transition from released to pressed
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTrigger {
    down: bool,
}

impl EdgeTrigger {
    /// Feed the current button state; true exactly on the press edge
    pub fn update(&mut self, down: bool) -> bool {
        let fired = down && !self.down;
        self.down = down;
        fired
    }

    pub fn is_down(&self) -> bool {
        self.down
    }
}

/// Write the framebuffer as top-down RGBA bytes (canvas `ImageData` layout)
/// into `out`, reusing its allocation.
pub fn write_rgba_top_down(fb: &Framebuffer, out: &mut Vec<u8>) {
    let width = fb.width() as usize;
    out.clear();
    out.reserve(fb.pixels().len() * 4);
    if width == 0 {
        return;
    }
    for row in fb.pixels().chunks_exact(width).rev() {
        for color in row {
            out.extend_from_slice(&color.to_rgba());
        }
    }
}

/// Top-down RGBA copy of the framebuffer
pub fn rgba_top_down(fb: &Framebuffer) -> Vec<u8> {
    let mut out = Vec::new();
    write_rgba_top_down(fb, &mut out);
    out
}
