// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Pose Overlay
//!
//! Draws body-geometry annotations over video frames from per-frame pose keypoints: a
//! bounding box around each person, the skeleton, a chest band and an estimated stature
//! label. The keypoints come from an external pose estimator (PoseNet-style output: named
//! parts with pixel positions and confidence scores).
//!
//! ## Pipeline
//!
//! Each frame goes through the same stateless steps:
//!
//! 1. the [`PoseEstimator`] returns up to `max_detections` poses,
//! 2. the surface is cleared and the frame is redrawn,
//! 3. for every pose, the derivations in [`geometry`] run against one shared confidence
//!    threshold and [`overlay`] turns them into [`DrawCommand`]s,
//! 4. a [`DrawSurface`] executes the commands.
//!
//! Derivations that lack keypoints skip their own output only. Nothing is carried between
//! frames.
//!
//! ## Quick Start (Library)
//!
//! ```rust
//! use pose_overlay::{BodyPart, Keypoint, OverlayConfig, Pose, overlay_pose};
//!
//! let pose = Pose::new(vec![
//!     Keypoint::new(BodyPart::Nose, 0.0, 0.0, 0.9),
//!     Keypoint::new(BodyPart::LeftAnkle, 0.0, 100.0, 0.9),
//! ])
//! .unwrap();
//!
//! let overlay = overlay_pose(&pose, &OverlayConfig::default());
//! assert_eq!(overlay.rounded_stature(), Some(100));
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Replay a recorded session on a blank 1280x720 canvas
//! pose-overlay run --poses session.json --show
//!
//! # Draw on a folder of frames and save the results to runs/overlay/run
//! pose-overlay run --poses session.json --source frames/ --save
//!
//! # Print the derived geometry without drawing
//! pose-overlay inspect --poses session.json
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`keypoint`] | [`BodyPart`], [`Keypoint`], [`Pose`] |
//! | [`geometry`] | Bounding box, skeleton edges, chest region, stature |
//! | [`overlay`] | Per-pose draw command generation |
//! | [`surface`] | [`DrawCommand`], [`DrawSurface`], [`CommandRecorder`] |
//! | [`annotate`] | [`RasterSurface`] drawing onto an RGBA image |
//! | [`estimator`] | [`PoseEstimator`] seam and JSON replay |
//! | [`driver`] | The frame loop |
//! | [`source`] | Frame sources |
//! | [`config`] | [`OverlayConfig`] |
//! | [`error`] | Error types ([`OverlayError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `visualize` | Real-time window display (default) |

// Modules
pub mod annotate;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod estimator;
pub mod geometry;
pub mod io;
pub mod keypoint;
pub mod overlay;
pub mod report;
pub mod source;
pub mod surface;
pub mod visualizer;

// Re-export main types for convenience
pub use annotate::RasterSurface;
pub use config::OverlayConfig;
pub use driver::{FrameDriver, RunSummary, StopSignal};
pub use error::{OverlayError, Result};
pub use estimator::{EstimateOptions, PoseEstimator, PoseRecording, ReplayEstimator};
pub use geometry::{
    BoundingBox, ChestProportions, ChestRegion, SkeletalEdge, bounding_box, chest_region,
    qualifying, skeletal_edges, stature,
};
pub use keypoint::{BodyPart, Keypoint, Point, Pose};
pub use overlay::{PoseOverlay, overlay_frame, overlay_pose, stature_label};
pub use report::describe_pose;
pub use source::{FrameMeta, Source, SourceIterator};
pub use surface::{CommandRecorder, DrawCommand, DrawSurface, Rect, TextAlign, TextStyle, render};
pub use visualizer::{Color, SKELETON};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pose-overlay");
    }
}
