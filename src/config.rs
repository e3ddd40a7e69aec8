// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Overlay configuration.
//!
//! [`OverlayConfig`] holds every tunable of the per-frame pipeline: the shared confidence
//! threshold, the detection bound handed to the pose estimator, the chest band proportions,
//! and the drawing styles.

use crate::error::{OverlayError, Result};
use crate::geometry::ChestProportions;
use crate::visualizer::Color;

/// Configuration for the overlay pipeline.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_overlay::OverlayConfig;
///
/// let config = OverlayConfig::new()
///     .with_confidence(0.6)
///     .with_max_detections(3)
///     .with_stature_gating(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Minimum keypoint score for any derivation (inclusive, 0.0 to 1.0).
    /// One value is shared by every derivation within a frame.
    pub confidence_threshold: f32,
    /// Maximum number of poses requested from the estimator per frame.
    pub max_detections: usize,
    /// Ask the estimator to mirror poses horizontally.
    pub flip_horizontal: bool,
    /// Also require the nose and left ankle to meet the threshold before estimating stature.
    /// Off by default, which always yields a best-effort estimate when both keypoints exist.
    pub gate_stature: bool,
    /// Radius of the filled keypoint markers, in pixels.
    pub marker_radius: f32,
    /// Stroke width of the bounding box and skeleton lines, in pixels.
    pub line_width: f32,
    /// Divisor of the shoulder-to-hip span that places the chest band above the torso midpoint.
    pub chest_offset_divisor: f32,
    /// Divisor of the shoulder-to-hip span that gives the chest band height.
    pub chest_height_divisor: f32,
    /// Stature label font size, in pixels.
    pub font_size: f32,
    /// Bounding box and skeleton color.
    pub line_color: Color,
    /// Keypoint marker color.
    pub marker_color: Color,
    /// Chest band fill color.
    pub chest_color: Color,
    /// Stature label color.
    pub text_color: Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            max_detections: 5,
            flip_horizontal: false,
            gate_stature: false,
            marker_radius: 3.0,
            line_width: 1.0,
            chest_offset_divisor: 2.25,
            chest_height_divisor: 4.0,
            font_size: 12.0,
            line_color: Color::WHITE,
            marker_color: Color::WHITE,
            chest_color: Color::WHITE_HALF,
            text_color: Color::WHITE,
        }
    }
}

impl OverlayConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence threshold.
    ///
    /// Keypoints scoring below this value take no part in any derivation.
    #[must_use]
    pub const fn with_confidence(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Set the maximum number of poses per frame.
    #[must_use]
    pub const fn with_max_detections(mut self, max: usize) -> Self {
        self.max_detections = max;
        self
    }

    /// Enable or disable horizontal mirroring of estimated poses.
    #[must_use]
    pub const fn with_flip_horizontal(mut self, flip: bool) -> Self {
        self.flip_horizontal = flip;
        self
    }

    /// Enable or disable confidence gating of the stature keypoints.
    #[must_use]
    pub const fn with_stature_gating(mut self, gate: bool) -> Self {
        self.gate_stature = gate;
        self
    }

    /// Set the keypoint marker radius.
    #[must_use]
    pub const fn with_marker_radius(mut self, radius: f32) -> Self {
        self.marker_radius = radius;
        self
    }

    /// Set the stroke width of outlines and skeleton lines.
    #[must_use]
    pub const fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Set the chest band proportions.
    ///
    /// # Arguments
    ///
    /// * `offset_divisor` - Span divisor for the upward offset from the torso midpoint.
    /// * `height_divisor` - Span divisor for the band height.
    #[must_use]
    pub const fn with_chest_proportions(mut self, offset_divisor: f32, height_divisor: f32) -> Self {
        self.chest_offset_divisor = offset_divisor;
        self.chest_height_divisor = height_divisor;
        self
    }

    /// Chest band proportions as used by [`crate::geometry::chest_region`].
    #[must_use]
    pub const fn chest_proportions(&self) -> ChestProportions {
        ChestProportions {
            offset_divisor: self.chest_offset_divisor,
            height_divisor: self.chest_height_divisor,
        }
    }

    /// Minimum score for the stature keypoints, when gating is enabled.
    #[must_use]
    pub const fn stature_min_score(&self) -> Option<f32> {
        if self.gate_stature {
            Some(self.confidence_threshold)
        } else {
            None
        }
    }

    /// Set the stature label font size.
    #[must_use]
    pub const fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(OverlayError::ConfigError(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.max_detections == 0 {
            return Err(OverlayError::ConfigError(
                "max detections must be at least 1".to_string(),
            ));
        }
        if self.chest_offset_divisor <= 0.0 || self.chest_height_divisor <= 0.0 {
            return Err(OverlayError::ConfigError(
                "chest proportion divisors must be positive".to_string(),
            ));
        }
        if self.marker_radius < 0.0 || self.line_width <= 0.0 || self.font_size <= 0.0 {
            return Err(OverlayError::ConfigError(
                "marker radius, line width and font size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OverlayConfig::default();
        assert!((config.confidence_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.max_detections, 5);
        assert!(!config.flip_horizontal);
        assert!(!config.gate_stature);
        assert!((config.chest_offset_divisor - 2.25).abs() < f32::EPSILON);
        assert!((config.chest_height_divisor - 4.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = OverlayConfig::new()
            .with_confidence(0.3)
            .with_max_detections(2)
            .with_flip_horizontal(true)
            .with_stature_gating(true)
            .with_marker_radius(5.0)
            .with_chest_proportions(3.0, 5.0);

        assert!((config.confidence_threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.max_detections, 2);
        assert!(config.flip_horizontal);
        assert!(config.gate_stature);
        assert!((config.marker_radius - 5.0).abs() < f32::EPSILON);
        assert!((config.chest_offset_divisor - 3.0).abs() < f32::EPSILON);
        assert_eq!(config.stature_min_score(), Some(0.3));
        assert_eq!(OverlayConfig::new().stature_min_score(), None);
    }

    #[test]
    fn test_config_validate_rejects_bad_values() {
        assert!(OverlayConfig::new().with_confidence(1.5).validate().is_err());
        assert!(OverlayConfig::new().with_max_detections(0).validate().is_err());
        assert!(
            OverlayConfig::new()
                .with_chest_proportions(0.0, 4.0)
                .validate()
                .is_err()
        );
    }
}
