use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{TextureValueError, WindowCanvas};
use sdl2::video::WindowBuildError;
use sdl2::IntegerOrSdlError;
use thiserror::Error;

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::FrameBuffer;

/// Bytes per pixel in an RGB24 texture
const CHANNELS: usize = 3;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("sdl error: {0}")]
    Sdl(String),

    #[error(transparent)]
    Window(#[from] WindowBuildError),

    #[error(transparent)]
    Canvas(#[from] IntegerOrSdlError),

    #[error(transparent)]
    Texture(#[from] TextureValueError),
}

impl From<String> for RenderError {
    fn from(message: String) -> Self {
        RenderError::Sdl(message)
    }
}

/// # Display
/// Draws a Chip-8 FrameBuffer into an SDL2 window.
///
/// The window is the 64x32 frame scaled up by an integer factor; lit pixels are
/// white and unlit pixels black.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    pub fn new(sdl: &sdl2::Sdl, scale: u32) -> Result<Self, RenderError> {
        let video_subsystem = sdl.video()?;
        let window = video_subsystem
            .window(
                "CHIP-8",
                DISPLAY_WIDTH as u32 * scale,
                DISPLAY_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()?;
        let canvas = window.into_canvas().build()?;

        let mut display = Display { canvas };
        display.render(&FrameBuffer::new())?;
        Ok(display)
    }

    /// Formats a Chip-8 FrameBuffer as RGB24 rows.
    ///
    /// This creates a black and white rendering by:
    /// - Walking the frame row by row, left to right
    /// - Triplicating each pixel to represent its RGB values
    /// - Multiplying each value by 255 to convert from a binary state to 0-255 intensity
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn frame_to_rgb24(frame: &FrameBuffer) -> Vec<u8> {
        (0..DISPLAY_HEIGHT)
            .flat_map(move |y| (0..DISPLAY_WIDTH).map(move |x| frame.pixel(x, y)))
            .flat_map(|pixel| std::iter::repeat(pixel * 255).take(CHANNELS))
            .collect()
    }

    /// Formats the Chip-8 FrameBuffer as an SDL2 RGB24 texture and presents it.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), RenderError> {
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator.create_texture_streaming(
            PixelFormatEnum::RGB24,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
        )?;

        let rgb = Display::frame_to_rgb24(frame);
        let row_len = DISPLAY_WIDTH * CHANNELS;
        texture.with_lock(None, |buffer: &mut [u8], pitch: usize| {
            for (y, row) in rgb.chunks(row_len).enumerate() {
                let offset = y * pitch;
                buffer[offset..offset + row_len].copy_from_slice(row);
            }
        })?;

        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_rgb24() {
        let mut frame = FrameBuffer::new();
        // (1, 0) and (0, 1)
        frame.draw(1, 0, &[0x80]);
        frame.draw(0, 1, &[0x80]);
        let rgb = Display::frame_to_rgb24(&frame);

        let mut expected: Vec<u8> = vec![0; 6144];
        expected[0..6].copy_from_slice(&[0, 0, 0, 255, 255, 255]);
        expected[192..198].copy_from_slice(&[255, 255, 255, 0, 0, 0]);

        assert_eq!(rgb, expected);
    }

    #[test]
    fn test_dark_frame_is_black() {
        let rgb = Display::frame_to_rgb24(&FrameBuffer::new());
        assert_eq!(rgb.len(), DISPLAY_WIDTH * DISPLAY_HEIGHT * CHANNELS);
        assert!(rgb.iter().all(|&channel| channel == 0));
    }
}
