// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use image::Rgba;

/// RGBA color used by draw commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color(255, 255, 255, 255);
    /// White at 50% opacity.
    pub const WHITE_HALF: Color = Color(255, 255, 255, 128);
    /// Opaque black.
    pub const BLACK: Color = Color(0, 0, 0, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);

    /// Create an opaque color from RGB values.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b, 255)
    }

    /// Create a color from RGB values and an opacity in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Whether the color is fully opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.3 == 255
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.0, c.1, c.2, c.3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_alpha_scaling() {
        assert_eq!(Color::rgba(255, 255, 255, 0.5), Color::WHITE_HALF);
        assert_eq!(Color::rgba(1, 2, 3, 2.0), Color(1, 2, 3, 255));
        assert!(Color::WHITE.is_opaque());
        assert!(!Color::WHITE_HALF.is_opaque());
    }

    #[test]
    fn test_into_rgba() {
        let px: Rgba<u8> = Color::rgb(4, 42, 255).into();
        assert_eq!(px, Rgba([4, 42, 255, 255]));
    }
}
