// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-pose overlay: turns derived geometry into draw commands.
//!
//! [`overlay_pose`] runs every derivation for one pose and returns the commands in a fixed
//! order: bounding box, keypoint markers, skeleton lines, chest band, stature label. Skipped
//! derivations are reported in [`PoseOverlay::skipped`] and never affect other poses.

use std::fmt;

use crate::config::OverlayConfig;
use crate::geometry::{self, BoundingBox, ChestRegion};
use crate::keypoint::{BodyPart, Pose};
use crate::surface::{DrawCommand, Rect, TextAlign, TextStyle};

/// Which derivation a skip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    BoundingBox,
    Stature,
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BoundingBox => "bounding box",
            Self::Stature => "stature",
        };
        f.write_str(name)
    }
}

/// A derivation that produced no output for a pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub derivation: Derivation,
    pub reason: String,
}

/// Everything derived for one pose in one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseOverlay {
    /// Draw commands in render order.
    pub commands: Vec<DrawCommand>,
    pub bounding_box: Option<BoundingBox>,
    /// Number of keypoints drawn as markers.
    pub markers: usize,
    /// Number of skeleton lines drawn.
    pub edges: usize,
    pub chest: Option<ChestRegion>,
    /// Stature proxy in pixels.
    pub stature: Option<f32>,
    /// Derivations that failed for this pose. Chest skips are expected and not listed.
    pub skipped: Vec<Skipped>,
}

impl PoseOverlay {
    /// Stature rounded to whole pixels, as shown in the label.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_stature(&self) -> Option<u32> {
        self.stature.map(|d| d.round() as u32)
    }

    /// Whether nothing at all was drawn for the pose.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Label text for a stature value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn stature_text(stature: f32) -> String {
    format!("Estimated height: {} pixels", stature.round() as u32)
}

/// Stature label placed at the nose.
///
/// Takes the pose alongside the value because the label is anchored on the head keypoint.
/// Returns `None` unless the nose meets the confidence threshold.
#[must_use]
pub fn stature_label(stature: f32, pose: &Pose, config: &OverlayConfig) -> Option<DrawCommand> {
    let head = pose.get_qualifying(BodyPart::Nose, config.confidence_threshold)?;
    Some(DrawCommand::Text {
        text: stature_text(stature),
        position: head.position,
        style: TextStyle {
            color: config.text_color,
            size: config.font_size,
            align: TextAlign::Center,
        },
    })
}

/// Run every derivation for a single pose.
///
/// A pose with no qualifying keypoint yields no commands at all. A missing stature only drops
/// the label.
#[must_use]
pub fn overlay_pose(pose: &Pose, config: &OverlayConfig) -> PoseOverlay {
    let threshold = config.confidence_threshold;
    let mut out = PoseOverlay::default();

    let bbox = match geometry::bounding_box(pose.keypoints(), threshold) {
        Ok(bbox) => bbox,
        Err(e) => {
            out.skipped.push(Skipped {
                derivation: Derivation::BoundingBox,
                reason: e.to_string(),
            });
            return out;
        }
    };
    out.commands.push(DrawCommand::StrokeRect {
        rect: Rect::new(bbox.min_x, bbox.min_y, bbox.width, bbox.height),
        color: config.line_color,
        width: config.line_width,
    });
    out.bounding_box = Some(bbox);

    for kp in geometry::qualifying(pose.keypoints(), threshold) {
        out.commands.push(DrawCommand::FillCircle {
            center: kp.position,
            radius: config.marker_radius,
            color: config.marker_color,
        });
        out.markers += 1;
    }

    let edges = geometry::skeletal_edges(pose, threshold);
    out.edges = edges.len();
    out.commands.extend(edges.iter().map(|edge| DrawCommand::Line {
        from: edge.from.position,
        to: edge.to.position,
        color: config.line_color,
        width: config.line_width,
    }));

    out.chest = geometry::chest_region(pose, threshold, config.chest_proportions());
    if let Some(chest) = out.chest {
        out.commands.push(DrawCommand::FillRect {
            rect: Rect::new(chest.x, chest.y, chest.width, chest.height),
            color: config.chest_color,
        });
    }

    match geometry::stature(pose, config.stature_min_score()) {
        Ok(stature) => {
            out.stature = Some(stature);
            if let Some(label) = stature_label(stature, pose, config) {
                out.commands.push(label);
            }
        }
        Err(e) => out.skipped.push(Skipped {
            derivation: Derivation::Stature,
            reason: e.to_string(),
        }),
    }

    out
}

/// Overlay every pose of a frame, bounded by `max_detections`.
///
/// Poses are handled independently; a skip in one never changes another's output.
#[must_use]
pub fn overlay_frame(poses: &[Pose], config: &OverlayConfig) -> Vec<PoseOverlay> {
    poses
        .iter()
        .take(config.max_detections)
        .map(|pose| overlay_pose(pose, config))
        .collect()
}
