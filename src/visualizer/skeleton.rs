// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use crate::keypoint::BodyPart;

/// Skeleton adjacency table (pairs of body parts joined by a limb line).
/// The overlay only ever draws edges from this table.
pub const SKELETON: [(BodyPart, BodyPart); 19] = [
    (BodyPart::Nose, BodyPart::LeftEye),
    (BodyPart::LeftEye, BodyPart::LeftEar),
    (BodyPart::Nose, BodyPart::RightEye),
    (BodyPart::RightEye, BodyPart::RightEar),
    (BodyPart::Nose, BodyPart::Neck),
    (BodyPart::RightShoulder, BodyPart::LeftShoulder),
    (BodyPart::Neck, BodyPart::LeftShoulder),
    (BodyPart::LeftShoulder, BodyPart::LeftElbow),
    (BodyPart::LeftElbow, BodyPart::LeftWrist),
    (BodyPart::Neck, BodyPart::RightShoulder),
    (BodyPart::RightShoulder, BodyPart::RightElbow),
    (BodyPart::RightElbow, BodyPart::RightWrist),
    (BodyPart::LeftShoulder, BodyPart::LeftHip),
    (BodyPart::LeftHip, BodyPart::RightHip),
    (BodyPart::LeftHip, BodyPart::LeftKnee),
    (BodyPart::LeftKnee, BodyPart::LeftAnkle),
    (BodyPart::RightShoulder, BodyPart::RightHip),
    (BodyPart::RightHip, BodyPart::RightKnee),
    (BodyPart::RightKnee, BodyPart::RightAnkle),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_skeleton_has_no_self_loops_or_duplicates() {
        let mut seen = HashSet::new();
        for (a, b) in SKELETON {
            assert_ne!(a, b);
            let key = if a < b { (a, b) } else { (b, a) };
            assert!(seen.insert(key), "duplicate edge {a}-{b}");
        }
    }

    #[test]
    fn test_skeleton_reaches_every_part() {
        let covered: HashSet<BodyPart> = SKELETON.iter().flat_map(|&(a, b)| [a, b]).collect();
        assert_eq!(covered.len(), BodyPart::COUNT);
    }
}
