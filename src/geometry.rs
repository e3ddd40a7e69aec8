// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pure geometry derivations over a single pose.
//!
//! Every function here is a pure function of the pose and a confidence threshold. None of
//! them keep state between calls, so running them twice on the same input yields identical
//! results.

use crate::error::{OverlayError, Result};
use crate::keypoint::{BodyPart, Keypoint, Point, Pose};
use crate::visualizer::skeleton::SKELETON;

/// Keypoints whose score meets `threshold` (inclusive).
pub fn qualifying(keypoints: &[Keypoint], threshold: f32) -> impl Iterator<Item = &Keypoint> {
    keypoints.iter().filter(move |kp| kp.meets(threshold))
}

/// Axis-aligned extents of the qualifying keypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f32 {
        self.min_x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.min_y + self.height
    }

    /// Whether a point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x() && p.y >= self.min_y && p.y <= self.max_y()
    }
}

/// Bounding box of the keypoints meeting `threshold`.
///
/// # Errors
///
/// Returns [`OverlayError::InsufficientKeypoints`] when no keypoint qualifies.
pub fn bounding_box(keypoints: &[Keypoint], threshold: f32) -> Result<BoundingBox> {
    let mut iter = qualifying(keypoints, threshold);
    let first = iter.next().ok_or_else(|| {
        OverlayError::InsufficientKeypoints(format!(
            "bounding box: no keypoint scores >= {threshold}"
        ))
    })?;

    let (mut min_x, mut min_y) = (first.position.x, first.position.y);
    let (mut max_x, mut max_y) = (min_x, min_y);
    for kp in iter {
        min_x = min_x.min(kp.position.x);
        min_y = min_y.min(kp.position.y);
        max_x = max_x.max(kp.position.x);
        max_y = max_y.max(kp.position.y);
    }

    Ok(BoundingBox {
        min_x,
        min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// A limb line between two qualifying keypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletalEdge {
    pub from: Keypoint,
    pub to: Keypoint,
}

/// Edges of the skeleton table whose endpoints both exist and meet `threshold`.
///
/// Edges come out in table order.
#[must_use]
pub fn skeletal_edges(pose: &Pose, threshold: f32) -> Vec<SkeletalEdge> {
    SKELETON
        .iter()
        .filter_map(|&(a, b)| {
            let from = pose.get_qualifying(a, threshold)?;
            let to = pose.get_qualifying(b, threshold)?;
            Some(SkeletalEdge {
                from: *from,
                to: *to,
            })
        })
        .collect()
}

/// Proportional placement of the chest band within the shoulder-to-hip span.
///
/// Both values are empirical tuning constants, not anatomical measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChestProportions {
    /// The band top sits `span / offset_divisor` above the left torso midpoint.
    pub offset_divisor: f32,
    /// The band is `span / height_divisor` tall.
    pub height_divisor: f32,
}

impl Default for ChestProportions {
    fn default() -> Self {
        Self {
            offset_divisor: 2.25,
            height_divisor: 4.0,
        }
    }
}

/// Rectangle approximating chest coverage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChestRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Chest band from both shoulders and both hips.
///
/// Returns `None` unless all four keypoints exist and meet `threshold`; an occluded torso is
/// expected and not an error.
#[must_use]
pub fn chest_region(pose: &Pose, threshold: f32, proportions: ChestProportions) -> Option<ChestRegion> {
    let left_shoulder = pose.get_qualifying(BodyPart::LeftShoulder, threshold)?;
    let right_shoulder = pose.get_qualifying(BodyPart::RightShoulder, threshold)?;
    let left_hip = pose.get_qualifying(BodyPart::LeftHip, threshold)?;
    let right_hip = pose.get_qualifying(BodyPart::RightHip, threshold)?;

    let chest_left = left_shoulder.position.midpoint(left_hip.position);
    let chest_right = right_shoulder.position.midpoint(right_hip.position);

    let span = left_hip.position.y - left_shoulder.position.y;
    let vertical_offset = span / proportions.offset_divisor;

    Some(ChestRegion {
        x: chest_left.x,
        y: chest_left.y - vertical_offset,
        width: chest_right.x - chest_left.x,
        height: span / proportions.height_divisor,
    })
}

/// Pixel distance from the nose to the left ankle.
///
/// This is an uncalibrated proxy: it mixes perspective, camera distance and posture with
/// true height. With `min_score` set, both keypoints must also meet it.
///
/// # Errors
///
/// Returns [`OverlayError::InsufficientKeypoints`] when either keypoint is missing, or
/// below `min_score` when gating is on.
pub fn stature(pose: &Pose, min_score: Option<f32>) -> Result<f32> {
    let find = |part: BodyPart| {
        let kp = match min_score {
            Some(threshold) => pose.get_qualifying(part, threshold),
            None => pose.get(part),
        };
        kp.ok_or_else(|| OverlayError::InsufficientKeypoints(format!("stature: no usable {part}")))
    };

    let head = find(BodyPart::Nose)?;
    let ankle = find(BodyPart::LeftAnkle)?;
    Ok(head.position.distance(ankle.position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kp(part: BodyPart, x: f32, y: f32, score: f32) -> Keypoint {
        Keypoint::new(part, x, y, score)
    }

    fn torso(score: f32) -> Pose {
        Pose::new(vec![
            kp(BodyPart::LeftShoulder, 0.0, 0.0, score),
            kp(BodyPart::RightShoulder, 10.0, 0.0, score),
            kp(BodyPart::LeftHip, 0.0, 20.0, score),
            kp(BodyPart::RightHip, 10.0, 20.0, score),
        ])
        .unwrap()
    }

    #[test]
    fn test_qualifying_is_inclusive() {
        let kps = [
            kp(BodyPart::Nose, 0.0, 0.0, 0.5),
            kp(BodyPart::Neck, 0.0, 0.0, 0.4999),
        ];
        let parts: Vec<BodyPart> = qualifying(&kps, 0.5).map(|k| k.part).collect();
        assert_eq!(parts, vec![BodyPart::Nose]);
    }

    #[test]
    fn test_bounding_box_extents() {
        let kps = [
            kp(BodyPart::Nose, 10.0, 5.0, 0.9),
            kp(BodyPart::LeftAnkle, 4.0, 50.0, 0.8),
            kp(BodyPart::RightWrist, 30.0, 20.0, 0.7),
            kp(BodyPart::LeftWrist, -100.0, -100.0, 0.1),
        ];
        let bbox = bounding_box(&kps, 0.5).unwrap();
        assert_eq!(bbox.min_x, 4.0);
        assert_eq!(bbox.min_y, 5.0);
        assert_eq!(bbox.width, 26.0);
        assert_eq!(bbox.height, 45.0);
        for k in qualifying(&kps, 0.5) {
            assert!(bbox.contains(k.position));
        }
    }

    #[test]
    fn test_bounding_box_single_keypoint_is_degenerate_but_valid() {
        let kps = [kp(BodyPart::Nose, 3.0, 4.0, 0.9)];
        let bbox = bounding_box(&kps, 0.5).unwrap();
        assert_eq!((bbox.width, bbox.height), (0.0, 0.0));
        assert!(bbox.contains(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_bounding_box_empty_is_error() {
        let kps = [kp(BodyPart::Nose, 3.0, 4.0, 0.2)];
        assert!(matches!(
            bounding_box(&kps, 0.5),
            Err(OverlayError::InsufficientKeypoints(_))
        ));
        assert!(bounding_box(&[], 0.5).is_err());
    }

    #[test]
    fn test_skeletal_edges_require_both_endpoints() {
        let pose = Pose::new(vec![
            kp(BodyPart::Nose, 0.0, 0.0, 0.9),
            kp(BodyPart::LeftEye, 1.0, -1.0, 0.9),
            kp(BodyPart::RightEye, -1.0, -1.0, 0.3),
            kp(BodyPart::LeftEar, 2.0, -1.0, 0.5),
        ])
        .unwrap();
        let edges = skeletal_edges(&pose, 0.5);
        let pairs: Vec<(BodyPart, BodyPart)> =
            edges.iter().map(|e| (e.from.part, e.to.part)).collect();
        assert_eq!(
            pairs,
            vec![
                (BodyPart::Nose, BodyPart::LeftEye),
                (BodyPart::LeftEye, BodyPart::LeftEar),
            ]
        );
        for pair in pairs {
            assert!(SKELETON.contains(&pair));
        }
    }

    #[test]
    fn test_chest_region_reference_values() {
        let region = chest_region(&torso(0.9), 0.5, ChestProportions::default()).unwrap();
        let offset = 20.0 / 2.25;
        assert!((region.x - 0.0).abs() < 1e-6);
        assert!((region.y - (10.0 - offset)).abs() < 1e-4);
        assert!((region.height - 5.0).abs() < 1e-6);
        assert!((region.width - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_chest_region_skips_when_any_corner_fails() {
        assert!(chest_region(&torso(0.4), 0.5, ChestProportions::default()).is_none());

        let pose = Pose::new(vec![
            kp(BodyPart::LeftShoulder, 0.0, 0.0, 0.9),
            kp(BodyPart::RightShoulder, 10.0, 0.0, 0.9),
            kp(BodyPart::LeftHip, 0.0, 20.0, 0.9),
        ])
        .unwrap();
        assert!(chest_region(&pose, 0.5, ChestProportions::default()).is_none());
    }

    #[test]
    fn test_stature_distances() {
        let pose = Pose::new(vec![
            kp(BodyPart::Nose, 5.0, 0.0, 0.9),
            kp(BodyPart::LeftAnkle, 5.0, 100.0, 0.9),
        ])
        .unwrap();
        assert_eq!(stature(&pose, None).unwrap(), 100.0);

        let pose = Pose::new(vec![
            kp(BodyPart::Nose, 0.0, 0.0, 0.9),
            kp(BodyPart::LeftAnkle, 3.0, 4.0, 0.9),
        ])
        .unwrap();
        assert_eq!(stature(&pose, None).unwrap(), 5.0);
    }

    #[test]
    fn test_stature_gating() {
        let pose = Pose::new(vec![
            kp(BodyPart::Nose, 0.0, 0.0, 0.9),
            kp(BodyPart::LeftAnkle, 3.0, 4.0, 0.1),
        ])
        .unwrap();
        assert_eq!(stature(&pose, None).unwrap(), 5.0);
        assert!(matches!(
            stature(&pose, Some(0.5)),
            Err(OverlayError::InsufficientKeypoints(_))
        ));
    }

    #[test]
    fn test_stature_missing_keypoint() {
        let pose = Pose::new(vec![kp(BodyPart::Nose, 0.0, 0.0, 0.9)]).unwrap();
        assert!(stature(&pose, None).is_err());
    }
}
