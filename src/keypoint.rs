// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Keypoint and pose types produced by a pose estimator.
//!
//! A [`Pose`] holds the keypoints of one detected person in one frame. Poses carry no
//! identity across frames and are read-only to the overlay pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};

/// Named anatomical landmark.
///
/// Serialized with the camelCase labels used by PoseNet-style estimators
/// (`"leftShoulder"`, `"rightAnkle"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    Neck,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    /// Number of distinct body parts.
    pub const COUNT: usize = 18;

    /// Every body part in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::Neck,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// The camelCase label of this part.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::Neck => "neck",
            Self::LeftShoulder => "leftShoulder",
            Self::RightShoulder => "rightShoulder",
            Self::LeftElbow => "leftElbow",
            Self::RightElbow => "rightElbow",
            Self::LeftWrist => "leftWrist",
            Self::RightWrist => "rightWrist",
            Self::LeftHip => "leftHip",
            Self::RightHip => "rightHip",
            Self::LeftKnee => "leftKnee",
            Self::RightKnee => "rightKnee",
            Self::LeftAnkle => "leftAnkle",
            Self::RightAnkle => "rightAnkle",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyPart {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|part| part.as_str() == s)
            .ok_or_else(|| OverlayError::InvalidPose(format!("unknown body part '{s}'")))
    }
}

/// 2-D pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between this point and another.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A single detected landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Which landmark this is.
    pub part: BodyPart,
    /// Pixel position in the frame.
    pub position: Point,
    /// Detection confidence (0.0 to 1.0).
    pub score: f32,
}

impl Keypoint {
    /// Create a new keypoint.
    #[must_use]
    pub const fn new(part: BodyPart, x: f32, y: f32, score: f32) -> Self {
        Self {
            part,
            position: Point::new(x, y),
            score,
        }
    }

    /// Whether the score meets the threshold (inclusive).
    #[must_use]
    pub fn meets(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

/// All keypoints attributed to one detected person in one frame.
///
/// Holds at most one keypoint per [`BodyPart`]; construction rejects duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPose")]
pub struct Pose {
    keypoints: Vec<Keypoint>,
    /// Overall pose score reported by the estimator, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
}

#[derive(Deserialize)]
struct RawPose {
    keypoints: Vec<Keypoint>,
    #[serde(default)]
    score: Option<f32>,
}

impl TryFrom<RawPose> for Pose {
    type Error = OverlayError;

    fn try_from(raw: RawPose) -> Result<Self> {
        Ok(Self::new(raw.keypoints)?.with_score(raw.score))
    }
}

impl Pose {
    /// Create a pose from its keypoints.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidPose`] if two keypoints share a body part.
    pub fn new(keypoints: Vec<Keypoint>) -> Result<Self> {
        let mut seen = [false; BodyPart::COUNT];
        for kp in &keypoints {
            let slot = &mut seen[kp.part as usize];
            if *slot {
                return Err(OverlayError::InvalidPose(format!(
                    "duplicate keypoint '{}'",
                    kp.part
                )));
            }
            *slot = true;
        }
        Ok(Self {
            keypoints,
            score: None,
        })
    }

    /// Attach an overall pose score.
    #[must_use]
    pub const fn with_score(mut self, score: Option<f32>) -> Self {
        self.score = score;
        self
    }

    /// Keypoints in estimator order.
    #[must_use]
    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    /// Overall pose score, if the estimator reported one.
    #[must_use]
    pub const fn score(&self) -> Option<f32> {
        self.score
    }

    /// Find the keypoint for a body part.
    #[must_use]
    pub fn get(&self, part: BodyPart) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.part == part)
    }

    /// Find the keypoint for a body part, only if it meets the threshold.
    #[must_use]
    pub fn get_qualifying(&self, part: BodyPart, threshold: f32) -> Option<&Keypoint> {
        self.get(part).filter(|kp| kp.meets(threshold))
    }

    /// Number of keypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    /// Whether the pose has no keypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Mirror every keypoint horizontally within a frame of the given width.
    #[must_use]
    pub fn mirrored(&self, frame_width: f32) -> Self {
        let keypoints = self
            .keypoints
            .iter()
            .map(|kp| Keypoint {
                position: Point::new(frame_width - kp.position.x, kp.position.y),
                ..*kp
            })
            .collect();
        Self {
            keypoints,
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_part_count() {
        assert_eq!(BodyPart::ALL.len(), BodyPart::COUNT);
        assert_eq!(BodyPart::RightAnkle as usize, BodyPart::COUNT - 1);
    }

    #[test]
    fn test_body_part_labels_round_trip() {
        for part in BodyPart::ALL {
            assert_eq!(part.as_str().parse::<BodyPart>().unwrap(), part);
        }
        assert!("leftToe".parse::<BodyPart>().is_err());
    }

    #[test]
    fn test_keypoint_meets_is_inclusive() {
        let kp = Keypoint::new(BodyPart::Nose, 0.0, 0.0, 0.5);
        assert!(kp.meets(0.5));
        assert!(!kp.meets(0.51));
    }

    #[test]
    fn test_pose_rejects_duplicate_parts() {
        let result = Pose::new(vec![
            Keypoint::new(BodyPart::Nose, 1.0, 1.0, 0.9),
            Keypoint::new(BodyPart::Nose, 2.0, 2.0, 0.8),
        ]);
        assert!(matches!(result, Err(OverlayError::InvalidPose(_))));
    }

    #[test]
    fn test_pose_get_qualifying() {
        let pose = Pose::new(vec![
            Keypoint::new(BodyPart::Nose, 1.0, 1.0, 0.9),
            Keypoint::new(BodyPart::Neck, 1.0, 5.0, 0.2),
        ])
        .unwrap();
        assert!(pose.get_qualifying(BodyPart::Nose, 0.5).is_some());
        assert!(pose.get(BodyPart::Neck).is_some());
        assert!(pose.get_qualifying(BodyPart::Neck, 0.5).is_none());
        assert!(pose.get(BodyPart::LeftHip).is_none());
    }

    #[test]
    fn test_point_distance_and_midpoint() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
        assert_eq!(
            Point::new(0.0, 0.0).midpoint(Point::new(10.0, 20.0)),
            Point::new(5.0, 10.0)
        );
    }

    #[test]
    fn test_pose_mirrored() {
        let pose = Pose::new(vec![Keypoint::new(BodyPart::Nose, 10.0, 7.0, 0.9)]).unwrap();
        let flipped = pose.mirrored(100.0);
        let nose = flipped.get(BodyPart::Nose).unwrap();
        assert_eq!(nose.position, Point::new(90.0, 7.0));
        assert_eq!(nose.score, 0.9);
    }

    #[test]
    fn test_pose_deserialize_posenet_shape() {
        let json = r#"{
            "score": 0.8,
            "keypoints": [
                {"part": "nose", "position": {"x": 5.0, "y": 0.0}, "score": 0.99},
                {"part": "leftAnkle", "position": {"x": 5.0, "y": 100.0}, "score": 0.7}
            ]
        }"#;
        let pose: Pose = serde_json::from_str(json).unwrap();
        assert_eq!(pose.len(), 2);
        assert_eq!(pose.score(), Some(0.8));
        assert_eq!(pose.get(BodyPart::LeftAnkle).unwrap().position.y, 100.0);
    }

    #[test]
    fn test_pose_deserialize_rejects_duplicates() {
        let json = r#"{"keypoints": [
            {"part": "nose", "position": {"x": 0.0, "y": 0.0}, "score": 0.9},
            {"part": "nose", "position": {"x": 1.0, "y": 1.0}, "score": 0.9}
        ]}"#;
        assert!(serde_json::from_str::<Pose>(json).is_err());
    }
}
