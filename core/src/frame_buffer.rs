use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

const PIXEL_COUNT: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// # FrameBuffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
///
/// Pixels are stored row-major as 0 (off) or 1 (on), so pixel (x, y) lives at
/// `x + y * DISPLAY_WIDTH`. Sprites are XORed onto the buffer and wrap around
/// both edges rather than clipping.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pixels: [u8; PIXEL_COUNT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [0; PIXEL_COUNT],
        }
    }

    /// Turns every pixel off
    pub fn reset(&mut self) {
        self.pixels = [0; PIXEL_COUNT];
    }

    /// XORs a sprite onto the buffer and reports whether any lit pixel was erased.
    ///
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    ///
    /// # Arguments
    /// * `x` the column of the sprite's left edge, taken modulo the width
    /// * `y` the row of the sprite's top edge, taken modulo the height
    /// * `sprite` the rows to draw
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let (x, y) = (x % DISPLAY_WIDTH, y % DISPLAY_HEIGHT);
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if (byte >> (7 - bit)) & 1 == 0 {
                    continue;
                }
                let px = (x + bit) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[px + py * DISPLAY_WIDTH];
                collision |= *pixel == 1;
                *pixel ^= 1;
            }
        }
        collision
    }

    /// The pixel at a row-major index, or `None` past the end of the buffer
    pub fn get_pixel(&self, index: usize) -> Option<u8> {
        self.pixels.get(index).copied()
    }

    /// The pixel at (x, y), wrapping like `draw` does
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[x % DISPLAY_WIDTH + (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH]
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterates the buffer one row of `DISPLAY_WIDTH` pixels at a time
    #[cfg(test)]
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(DISPLAY_WIDTH)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
