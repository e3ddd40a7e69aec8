// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Plain-text summaries of derived geometry, for inspecting recordings without rendering.

use std::fmt::Write;

use crate::config::OverlayConfig;
use crate::geometry;
use crate::keypoint::Pose;
use crate::overlay::overlay_pose;

/// Describe everything derived for one pose.
///
/// ```text
/// pose 0 (score 0.87): 12/17 keypoints >= 0.5
///   box      (101.2, 40.0) 80.5 x 310.0
///   skeleton 9 edges
///   chest    (110.0, 90.6) 60.1 x 24.3
///   stature  296 px
/// ```
#[must_use]
pub fn describe_pose(index: usize, pose: &Pose, config: &OverlayConfig) -> String {
    let threshold = config.confidence_threshold;
    let overlay = overlay_pose(pose, config);
    let qualifying = geometry::qualifying(pose.keypoints(), threshold).count();

    let mut out = format!("pose {index}");
    if let Some(score) = pose.score() {
        let _ = write!(out, " (score {score:.2})");
    }
    let _ = writeln!(out, ": {qualifying}/{} keypoints >= {threshold}", pose.len());

    match overlay.bounding_box {
        Some(b) => {
            let _ = writeln!(
                out,
                "  box      ({:.1}, {:.1}) {:.1} x {:.1}",
                b.min_x, b.min_y, b.width, b.height
            );
            let _ = writeln!(out, "  skeleton {} edges", overlay.edges);
        }
        None => {
            let _ = writeln!(out, "  box      -");
        }
    }

    match overlay.chest {
        Some(c) => {
            let _ = writeln!(
                out,
                "  chest    ({:.1}, {:.1}) {:.1} x {:.1}",
                c.x, c.y, c.width, c.height
            );
        }
        None => {
            let _ = writeln!(out, "  chest    -");
        }
    }

    match overlay.rounded_stature() {
        Some(px) => {
            let _ = writeln!(out, "  stature  {px} px");
        }
        None => {
            let _ = writeln!(out, "  stature  -");
        }
    }

    for skip in &overlay.skipped {
        let _ = writeln!(out, "  skipped  {}: {}", skip.derivation, skip.reason);
    }

    out
}
