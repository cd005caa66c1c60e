//! Owned pixel buffer handed to the presentation layer for blitting
//!
//! Rows are stored bottom-up: row 0 is the bottom of the displayed image,
//! matching a positive-height device-independent bitmap.

use super::color::Color;

/// Pixel format of the raw memory exposed to presenters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32-bit `0xAARRGGBB` words, row 0 at the bottom
    Argb32BottomUp,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Argb32BottomUp => 4,
        }
    }
}

/// Everything a presenter needs to interpret [`Framebuffer::as_bytes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub stride_bytes: usize,
    pub format: PixelFormat,
}

/// A fixed-size grid of packed colors. `memory.len() == width * height`.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    memory: Vec<Color>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    /// Allocate a zeroed buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            memory: vec![Color::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Linear offset of pixel `(x, y)`: `y * width + x`
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Whether `(x, y)` lies inside the buffer
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Fill every pixel with `color`
    pub fn clear(&mut self, color: Color) {
        self.memory.fill(color);
    }

    /// Write one pixel without clipping.
    ///
    /// Precondition: `0 <= x < width` and `0 <= y < height`. This is the hot
    /// path of every rasterizer; bounds are only asserted in debug builds. In
    /// release an out-of-range coordinate either lands in a neighbouring row
    /// or panics on the slice index; it never writes outside the allocation.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        debug_assert!(
            self.contains(x, y),
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        let idx = (y as isize * self.width as isize + x as isize) as usize;
        self.memory[idx] = color;
    }

    /// Write one pixel, silently dropping it if out of range.
    /// Returns whether the pixel landed.
    #[inline]
    pub fn plot(&mut self, x: i32, y: i32, color: Color) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.index(x as u32, y as u32);
        self.memory[idx] = color;
        true
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.memory[self.index(x as u32, y as u32)])
    }

    /// Raw pixels, bottom-up row order
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.memory
    }

    /// Raw pixel memory as bytes (native-endian `u32` words)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.memory)
    }

    /// Raw pixel memory as packed `u32` words
    #[inline]
    pub fn as_words(&self) -> &[u32] {
        bytemuck::cast_slice(&self.memory)
    }

    pub fn layout(&self) -> Layout {
        let format = PixelFormat::Argb32BottomUp;
        Layout {
            width: self.width,
            height: self.height,
            stride_bytes: self.width as usize * format.bytes_per_pixel(),
            format,
        }
    }

    /// Number of pixels currently equal to `color`
    pub fn count(&self, color: Color) -> usize {
        self.memory.iter().filter(|&&c| c == color).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let fb = Framebuffer::new(8, 4);
        assert_eq!(fb.pixels().len(), 32);
        assert!(fb.pixels().iter().all(|&c| c == Color(0)));
    }

    #[test]
    fn test_clear_and_set_pixel() {
        let mut fb = Framebuffer::new(8, 4);
        fb.clear(Color::BLACK);
        fb.set_pixel(3, 2, Color::RED);

        assert_eq!(fb.index(3, 2), 2 * 8 + 3);
        assert_eq!(fb.pixels()[19], Color::RED);
        assert_eq!(fb.get_pixel(3, 2), Some(Color::RED));
        assert_eq!(fb.count(Color::BLACK), 31);
    }

    #[test]
    fn test_plot_clips() {
        let mut fb = Framebuffer::new(4, 4);
        assert!(!fb.plot(-1, 0, Color::WHITE));
        assert!(!fb.plot(0, 4, Color::WHITE));
        assert!(fb.plot(3, 3, Color::WHITE));
        assert_eq!(fb.count(Color::WHITE), 1);
        assert_eq!(fb.get_pixel(4, 0), None);
    }

    #[test]
    fn test_layout_and_bytes() {
        let mut fb = Framebuffer::new(5, 3);
        fb.clear(Color::BLUE);
        let layout = fb.layout();
        assert_eq!(layout.stride_bytes, 20);
        assert_eq!(layout.format, PixelFormat::Argb32BottomUp);
        assert_eq!(fb.as_bytes().len(), 5 * 3 * 4);
        assert!(fb.as_words().iter().all(|&w| w == 0xFF00_00FF));
    }
}
