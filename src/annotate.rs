// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Raster drawing surface backed by an RGBA image.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{
    Blend, draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut,
    draw_line_segment_mut, draw_text_mut, text_size,
};

use crate::keypoint::Point;
use crate::surface::{DrawSurface, Rect, TextAlign, TextStyle};
use crate::visualizer::Color;
use crate::{verbose, warn};

/// Assets URL for downloading fonts
const ASSETS_URL: &str = "https://github.com/ultralytics/assets/releases/download/v0.0.0";

/// Default label font.
pub const DEFAULT_FONT: &str = "Arial.ttf";

/// Check if font exists locally or download it
pub fn check_font(font: &str) -> Option<PathBuf> {
    let font_name = Path::new(font).file_name()?.to_string_lossy();
    let config_dir = dirs::config_dir()?.join("pose-overlay");
    let font_path = config_dir.join(font_name.as_ref());

    if font_path.exists() {
        return Some(font_path);
    }

    if let Err(e) = fs::create_dir_all(&config_dir) {
        warn!("Failed to create config directory: {e}");
        return None;
    }

    let url = format!("{ASSETS_URL}/{font_name}");
    verbose!("Downloading {url} to {}", font_path.display());

    match ureq::get(&url).call() {
        Ok(response) => {
            let mut file = match File::create(&font_path) {
                Ok(f) => f,
                Err(e) => {
                    warn!("Failed to create font file: {e}");
                    return None;
                }
            };

            let mut reader = response.into_body().into_reader();
            if let Err(e) = io::copy(&mut reader, &mut file) {
                warn!("Failed to download font: {e}");
                let _ = fs::remove_file(&font_path);
                return None;
            }

            Some(font_path)
        }
        Err(e) => {
            warn!("Failed to download font from {url}: {e}");
            None
        }
    }
}

/// Load a font from an explicit path, or fall back to the cached default font.
pub fn load_font(path: Option<&Path>) -> Option<FontArc> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => check_font(DEFAULT_FONT)?,
    };
    let data = fs::read(&path)
        .map_err(|e| warn!("Failed to read font {}: {e}", path.display()))
        .ok()?;
    FontArc::try_from_vec(data)
        .map_err(|e| warn!("Invalid font {}: {e}", path.display()))
        .ok()
}

/// Round a float rectangle to pixels, flipping negative extents.
///
/// Returns `None` when the result is smaller than `min_size` on either axis.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_rect(rect: Rect, min_size: u32) -> Option<imageproc::rect::Rect> {
    let (x, width) = if rect.width < 0.0 {
        (rect.x + rect.width, -rect.width)
    } else {
        (rect.x, rect.width)
    };
    let (y, height) = if rect.height < 0.0 {
        (rect.y + rect.height, -rect.height)
    } else {
        (rect.y, rect.height)
    };

    let w = (width.round() as u32).max(min_size);
    let h = (height.round() as u32).max(min_size);
    if w == 0 || h == 0 {
        return None;
    }
    Some(imageproc::rect::Rect::at(x.round() as i32, y.round() as i32).of_size(w, h))
}

/// A [`DrawSurface`] that rasterizes onto an RGBA canvas.
///
/// Translucent fills are alpha-blended over what is already on the canvas.
pub struct RasterSurface {
    canvas: Blend<RgbaImage>,
    font: Option<FontArc>,
    warned_no_font: bool,
}

impl RasterSurface {
    /// Create a transparent canvas.
    #[must_use]
    pub fn new(width: u32, height: u32, font: Option<FontArc>) -> Self {
        Self {
            canvas: Blend(RgbaImage::new(width, height)),
            font,
            warned_no_font: false,
        }
    }

    /// Canvas width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.canvas.0.width()
    }

    /// Canvas height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.canvas.0.height()
    }

    /// Current canvas contents.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    /// Resize the canvas, discarding its contents, if the size differs.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width() != width || self.height() != height {
            self.canvas = Blend(RgbaImage::new(width, height));
        }
    }

    /// Whether a font is loaded for text labels.
    #[must_use]
    pub const fn has_font(&self) -> bool {
        self.font.is_some()
    }
}

impl DrawSurface for RasterSurface {
    fn begin_frame(&mut self, width: u32, height: u32) {
        self.resize(width, height);
    }

    #[allow(clippy::cast_sign_loss)]
    fn clear_region(&mut self, rect: Rect) {
        let Some(r) = pixel_rect(rect, 0) else {
            return;
        };
        let (w, h) = (self.width() as i32, self.height() as i32);
        let x0 = r.left().clamp(0, w);
        let y0 = r.top().clamp(0, h);
        let x1 = (r.right() + 1).clamp(0, w);
        let y1 = (r.bottom() + 1).clamp(0, h);
        for y in y0..y1 {
            for x in x0..x1 {
                self.canvas.0.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, 0]));
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_image(&mut self, frame: &DynamicImage, rect: Rect) {
        let Some(r) = pixel_rect(rect, 0) else {
            return;
        };
        let mut rgba = frame.to_rgba8();
        if rgba.width() != r.width() || rgba.height() != r.height() {
            rgba = imageops::resize(&rgba, r.width(), r.height(), FilterType::Triangle);
        }
        imageops::replace(&mut self.canvas.0, &rgba, i64::from(r.left()), i64::from(r.top()));
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let Some(r) = pixel_rect(rect, 1) else {
            return;
        };
        let thickness = (width.round() as i32).max(1);
        // Outline passes through both edges so the extreme points stay on the box
        let (x1, y1) = (r.left(), r.top());
        let (x2, y2) = (x1 + r.width() as i32, y1 + r.height() as i32);
        // Nested outlines grow the stroke inwards
        for t in 0..thickness {
            let tx1 = (x1 + t).min(x2);
            let ty1 = (y1 + t).min(y2);
            let tx2 = (x2 - t).max(tx1);
            let ty2 = (y2 - t).max(ty1);
            let inner = imageproc::rect::Rect::at(tx1, ty1)
                .of_size((tx2 - tx1 + 1) as u32, (ty2 - ty1 + 1) as u32);
            draw_hollow_rect_mut(&mut self.canvas, inner, color.into());
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if let Some(r) = pixel_rect(rect, 0) {
            draw_filled_rect_mut(&mut self.canvas, r, color.into());
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let thickness = (width.round() as i32).max(1);
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len = dx.hypot(dy);
        // Unit normal, used to offset parallel strokes for wide lines
        let (nx, ny) = if len > 0.0 {
            (-dy / len, dx / len)
        } else {
            (0.0, 0.0)
        };
        for i in 0..thickness {
            let offset = i as f32 - (thickness - 1) as f32 / 2.0;
            draw_line_segment_mut(
                &mut self.canvas,
                (from.x + nx * offset, from.y + ny * offset),
                (to.x + nx * offset, to.y + ny * offset),
                color.into(),
            );
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        draw_filled_circle_mut(
            &mut self.canvas,
            (center.x.round() as i32, center.y.round() as i32),
            radius.round() as i32,
            color.into(),
        );
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        let Some(font) = &self.font else {
            if !self.warned_no_font {
                warn!("No font available, text labels will not be drawn");
                self.warned_no_font = true;
            }
            return;
        };

        let scale = PxScale::from(style.size);
        let (tw, th) = text_size(scale, font, text);
        let x = match style.align {
            TextAlign::Left => position.x,
            TextAlign::Center => position.x - tw as f32 / 2.0,
            TextAlign::Right => position.x - tw as f32,
        };
        // The anchor is the baseline, imageproc draws from the top edge
        let y = position.y - th as f32;
        draw_text_mut(
            &mut self.canvas,
            style.color.into(),
            x.round() as i32,
            y.round() as i32,
            scale,
            font,
            text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_rect_normalizes_negative_extent() {
        let r = pixel_rect(Rect::new(10.0, 10.0, -4.0, 2.0), 0).unwrap();
        assert_eq!((r.left(), r.top(), r.width(), r.height()), (6, 10, 4, 2));
        assert!(pixel_rect(Rect::new(0.0, 0.0, 0.0, 5.0), 0).is_none());
        assert_eq!(pixel_rect(Rect::new(3.0, 3.0, 0.0, 0.0), 1).unwrap().width(), 1);
    }

    #[test]
    fn test_fill_rect_blends_half_white_over_black() {
        let mut surface = RasterSurface::new(10, 10, None);
        surface.draw_image(&DynamicImage::new_rgb8(10, 10), Rect::frame(10, 10));
        surface.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), Color::WHITE_HALF);

        let inside = surface.image().get_pixel(3, 3);
        assert!(inside[0] > 100 && inside[0] < 160, "got {inside:?}");
        assert_eq!(inside[3], 255);
        assert_eq!(*surface.image().get_pixel(8, 8), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut surface = RasterSurface::new(20, 20, None);
        surface.stroke_rect(Rect::new(2.0, 2.0, 10.0, 10.0), Color::WHITE, 1.0);
        assert_eq!(*surface.image().get_pixel(2, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.image().get_pixel(12, 7), Rgba([255, 255, 255, 255]));
        assert_eq!(surface.image().get_pixel(7, 7)[3], 0);
    }

    #[test]
    fn test_circle_line_and_clear() {
        let mut surface = RasterSurface::new(20, 20, None);
        surface.fill_circle(Point::new(10.0, 10.0), 3.0, Color::WHITE);
        assert_eq!(surface.image().get_pixel(10, 12)[3], 255);

        surface.draw_line(Point::new(0.0, 0.0), Point::new(19.0, 0.0), Color::WHITE, 1.0);
        assert_eq!(surface.image().get_pixel(15, 0)[3], 255);

        surface.clear_region(Rect::frame(20, 20));
        assert!(surface.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut surface = RasterSurface::new(20, 20, None);
        let style = TextStyle {
            color: Color::WHITE,
            size: 12.0,
            align: TextAlign::Center,
        };
        surface.draw_text("Estimated height: 5 pixels", Point::new(10.0, 10.0), &style);
        assert!(!surface.has_font());
        assert!(surface.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_draw_image_scales_into_rect() {
        let mut surface = RasterSurface::new(8, 8, None);
        let frame = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])));
        surface.draw_image(&frame, Rect::frame(8, 8));
        assert_eq!(*surface.image().get_pixel(7, 7), Rgba([9, 9, 9, 255]));
    }
}
