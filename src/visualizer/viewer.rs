// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Window for watching the overlay live.

use std::time::Duration;

use image::RgbaImage;
use minifb::{Key, Window, WindowOptions};

use crate::error::{OverlayError, Result};

/// Pack an RGBA pixel as `0x00RRGGBB`, compositing over black.
fn pack_pixel(pixel: image::Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    let scale = |c: u8| (u32::from(c) * u32::from(a) + 127) / 255;
    (scale(r) << 16) | (scale(g) << 8) | scale(b)
}

/// A simple frame viewer using minifb.
pub struct Viewer {
    window: Window,
    pub width: usize,
    pub height: usize,
    buffer: Vec<u32>,
}

impl Viewer {
    /// Create a new viewer window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be opened.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| OverlayError::VisualizerError(format!("Failed to create window: {e}")))?;

        // ~60 fps
        window.limit_update_rate(Some(Duration::from_micros(16600)));

        Ok(Self {
            window,
            width,
            height,
            buffer: Vec::new(),
        })
    }

    /// Whether the user asked to close the window (closed, Esc or Q).
    #[must_use]
    pub fn should_close(&self) -> bool {
        !self.window.is_open()
            || self.window.is_key_down(Key::Escape)
            || self.window.is_key_down(Key::Q)
    }

    /// Show a new frame. Returns `false` once the window should close.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be updated.
    pub fn update(&mut self, image: &RgbaImage) -> Result<bool> {
        if self.should_close() {
            return Ok(false);
        }

        self.buffer.clear();
        self.buffer.extend(image.pixels().map(|p| pack_pixel(*p)));
        self.width = image.width() as usize;
        self.height = image.height() as usize;

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| OverlayError::VisualizerError(format!("Failed to update window: {e}")))?;

        Ok(true)
    }

    /// Keep the last frame on screen for `duration`. Returns `false` if the window was closed.
    pub fn wait(&mut self, duration: Duration) -> bool {
        if self.buffer.is_empty() {
            return true;
        }

        let start = std::time::Instant::now();
        while start.elapsed() < duration {
            if self.should_close() {
                return false;
            }
            let _ = self
                .window
                .update_with_buffer(&self.buffer, self.width, self.height);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_pixel() {
        assert_eq!(pack_pixel(image::Rgba([255, 128, 0, 255])), 0x00FF_8000);
        assert_eq!(pack_pixel(image::Rgba([255, 255, 255, 0])), 0);
        assert_eq!(pack_pixel(image::Rgba([255, 255, 255, 128])), 0x0080_8080);
    }
}
