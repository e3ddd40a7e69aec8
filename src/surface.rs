// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Draw commands and the surfaces that execute them.
//!
//! The overlay pipeline only produces [`DrawCommand`] values. Anything with side effects lives
//! behind [`DrawSurface`], so the geometry can be tested without a canvas.

use image::DynamicImage;

use crate::keypoint::Point;
use crate::visualizer::Color;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` x `height` frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frame(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }
}

/// Horizontal anchoring of a text label relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How a text label is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
    pub align: TextAlign,
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Reset a region to transparent.
    ClearRegion(Rect),
    /// Blit the current video frame into a region.
    DrawImage(Rect),
    /// Unfilled rectangle outline.
    StrokeRect { rect: Rect, color: Color, width: f32 },
    /// Filled rectangle, alpha-blended when the color is translucent.
    FillRect { rect: Rect, color: Color },
    /// Straight line segment.
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f32,
    },
    /// Filled disc.
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
    },
    /// Text label; `position` is the baseline anchor.
    Text {
        text: String,
        position: Point,
        style: TextStyle,
    },
}

/// A 2-D drawing context.
pub trait DrawSurface {
    /// Called before each frame is drawn with the frame's size.
    fn begin_frame(&mut self, _width: u32, _height: u32) {}
    /// Reset a region to transparent.
    fn clear_region(&mut self, rect: Rect);
    /// Draw a frame scaled into `rect`.
    fn draw_image(&mut self, frame: &DynamicImage, rect: Rect);
    /// Draw a rectangle outline.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Draw a line segment.
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32);
    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
    /// Draw a text label.
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Execute a single overlay command.
    ///
    /// [`DrawCommand::DrawImage`] carries no pixels and is ignored here; frames go through
    /// [`DrawSurface::draw_image`] directly.
    fn execute(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::ClearRegion(rect) => self.clear_region(*rect),
            DrawCommand::DrawImage(_) => {}
            DrawCommand::StrokeRect { rect, color, width } => self.stroke_rect(*rect, *color, *width),
            DrawCommand::FillRect { rect, color } => self.fill_rect(*rect, *color),
            DrawCommand::Line {
                from,
                to,
                color,
                width,
            } => self.draw_line(*from, *to, *color, *width),
            DrawCommand::FillCircle {
                center,
                radius,
                color,
            } => self.fill_circle(*center, *radius, *color),
            DrawCommand::Text {
                text,
                position,
                style,
            } => self.draw_text(text, *position, style),
        }
    }
}

/// Execute every command in order.
pub fn render<S: DrawSurface + ?Sized>(surface: &mut S, commands: &[DrawCommand]) {
    for command in commands {
        surface.execute(command);
    }
}

/// A surface that records commands instead of drawing them.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for CommandRecorder {
    fn clear_region(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRegion(rect));
    }

    fn draw_image(&mut self, _frame: &DynamicImage, rect: Rect) {
        self.commands.push(DrawCommand::DrawImage(rect));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_replays_commands_in_order() {
        let commands = vec![
            DrawCommand::StrokeRect {
                rect: Rect::new(1.0, 2.0, 3.0, 4.0),
                color: Color::WHITE,
                width: 1.0,
            },
            DrawCommand::FillCircle {
                center: Point::new(5.0, 5.0),
                radius: 3.0,
                color: Color::WHITE,
            },
            DrawCommand::Text {
                text: "hi".to_string(),
                position: Point::new(0.0, 0.0),
                style: TextStyle {
                    color: Color::WHITE,
                    size: 12.0,
                    align: TextAlign::Center,
                },
            },
        ];

        let mut recorder = CommandRecorder::new();
        render(&mut recorder, &commands);
        assert_eq!(recorder.commands(), commands.as_slice());
        assert_eq!(recorder.take().len(), 3);
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn test_recorder_logs_frame_commands() {
        let mut recorder = CommandRecorder::new();
        let frame = DynamicImage::new_rgb8(4, 2);
        recorder.clear_region(Rect::frame(4, 2));
        recorder.draw_image(&frame, Rect::frame(4, 2));
        assert_eq!(
            recorder.commands(),
            &[
                DrawCommand::ClearRegion(Rect::new(0.0, 0.0, 4.0, 2.0)),
                DrawCommand::DrawImage(Rect::new(0.0, 0.0, 4.0, 2.0)),
            ]
        );
    }
}
