//! Integer rasterization of circle outlines and line segments
//!
//! Float coordinates are truncated toward zero (`as i32`), never rounded, in
//! both rasterizers so shapes line up with each other.

use glam::Vec2;

use super::color::Color;
use super::framebuffer::Framebuffer;

/// First-octant offsets `(x, y)` of a circle outline, starting at `(r, 0)`
/// and ending once `x < y`.
///
/// At each step `y` advances by one and `x` drops by one only when that
/// brings `x² + y²` closer to `r²`.
pub fn circle_octant(radius: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::with_capacity(radius.max(0) as usize + 1);
    let r2 = radius * radius;
    let mut x = radius;
    let mut y = 0;

    while x >= y {
        points.push((x, y));
        y += 1;

        let y2 = y * y;
        let keep_err = (x * x + y2 - r2).abs();
        let step_err = ((x - 1) * (x - 1) + y2 - r2).abs();
        if step_err < keep_err {
            x -= 1;
        }
    }

    points
}

/// Draw a one-pixel-wide circle outline.
///
/// Each octant point is mirrored into all eight octants. Pixels falling
/// outside the buffer are dropped; the simulation keeps balls at least one
/// radius from every edge, so in practice nothing is clipped.
pub fn draw_circle(fb: &mut Framebuffer, center: Vec2, radius: f32, color: Color) {
    let cx = center.x as i32;
    let cy = center.y as i32;

    for (x, y) in circle_octant(radius as i32) {
        fb.plot(cx + x, cy + y, color);
        fb.plot(cx + y, cy + x, color);
        fb.plot(cx - y, cy + x, color);
        fb.plot(cx - x, cy + y, color);
        fb.plot(cx - x, cy - y, color);
        fb.plot(cx - y, cy - x, color);
        fb.plot(cx + y, cy - x, color);
        fb.plot(cx + x, cy - y, color);
    }
}

/// Draw a line segment with one pixel per unit step along the major axis.
///
/// Endpoints are truncated then clamped into the buffer, so arbitrary input
/// (a cursor dragged off-screen) is safe. Stepping always runs from the lower
/// to the higher major-axis coordinate, which makes the result independent of
/// argument order.
pub fn draw_line(fb: &mut Framebuffer, p1: Vec2, p2: Vec2, color: Color) {
    if fb.width() == 0 || fb.height() == 0 {
        return;
    }
    let max_x = fb.width() as i32 - 1;
    let max_y = fb.height() as i32 - 1;

    let x1 = (p1.x as i32).clamp(0, max_x);
    let y1 = (p1.y as i32).clamp(0, max_y);
    let x2 = (p2.x as i32).clamp(0, max_x);
    let y2 = (p2.y as i32).clamp(0, max_y);

    if x1 == x2 && y1 == y2 {
        fb.set_pixel(x1, y1, color);
        return;
    }

    let dx = x2 - x1;
    let dy = y2 - y1;

    if dx.abs() > dy.abs() {
        let m = dy as f32 / dx as f32;
        let ((x_start, y_start), x_end) = if x1 < x2 {
            ((x1, y1), x2)
        } else {
            ((x2, y2), x1)
        };
        for x in x_start..=x_end {
            let y = (m * (x - x_start) as f32 + y_start as f32) as i32;
            fb.set_pixel(x, y, color);
        }
    } else {
        let m = dx as f32 / dy as f32;
        let ((x_start, y_start), y_end) = if y1 < y2 {
            ((x1, y1), y2)
        } else {
            ((x2, y2), y1)
        };
        for y in y_start..=y_end {
            let x = (m * (y - y_start) as f32 + x_start as f32) as i32;
            fb.set_pixel(x, y, color);
        }
    }
}
