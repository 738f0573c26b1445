//! Selects the joints an exercise measures from a [`Pose`].

use crate::angle::checked_angle_2d;
use crate::pose::{LandmarkIdx, Pose, Side};

/// Three landmarks forming a joint angle: the angle is measured at `vertex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointTriplet {
    pub proximal: LandmarkIdx,
    pub vertex: LandmarkIdx,
    pub distal: LandmarkIdx,
}

impl JointTriplet {
    pub const fn new(proximal: LandmarkIdx, vertex: LandmarkIdx, distal: LandmarkIdx) -> Self {
        Self {
            proximal,
            vertex,
            distal,
        }
    }

    /// Shoulder, elbow, wrist.
    pub fn elbow(side: Side) -> Self {
        Self::new(
            LandmarkIdx::shoulder(side),
            LandmarkIdx::elbow(side),
            LandmarkIdx::wrist(side),
        )
    }

    /// Hip, knee, ankle.
    pub fn knee(side: Side) -> Self {
        Self::new(
            LandmarkIdx::hip(side),
            LandmarkIdx::knee(side),
            LandmarkIdx::ankle(side),
        )
    }

    /// Hip, shoulder, elbow: how far the upper arm is raised away from the torso.
    pub fn shoulder(side: Side) -> Self {
        Self::new(
            LandmarkIdx::hip(side),
            LandmarkIdx::shoulder(side),
            LandmarkIdx::elbow(side),
        )
    }

    /// Shoulder, hip, ankle: 180° when the body forms a straight line.
    pub fn body_line(side: Side) -> Self {
        Self::new(
            LandmarkIdx::shoulder(side),
            LandmarkIdx::hip(side),
            LandmarkIdx::ankle(side),
        )
    }

    fn indices(&self) -> [LandmarkIdx; 3] {
        [self.proximal, self.vertex, self.distal]
    }

    /// Looks up the image-plane positions of the three landmarks.
    ///
    /// Returns [`None`] if any of them is below `min_visibility`.
    pub fn resolve(&self, pose: &Pose, min_visibility: f32) -> Option<[[f32; 2]; 3]> {
        let [a, b, c] = self.indices().map(|idx| pose.get(idx));
        if [a, b, c].iter().any(|lm| !lm.is_usable(min_visibility)) {
            return None;
        }
        Some([[a.x(), a.y()], [b.x(), b.y()], [c.x(), c.y()]])
    }

    /// Measures the joint angle, in degrees.
    ///
    /// Returns [`None`] if the joint is not sufficiently visible, or if two of its landmarks
    /// coincide so that no angle can be measured.
    pub fn measure(&self, pose: &Pose, min_visibility: f32) -> Option<f32> {
        let [a, b, c] = self.resolve(pose, min_visibility)?;
        let angle = checked_angle_2d(a, b, c);
        if angle.is_none() {
            log::trace!("degenerate joint {self:?}");
        }
        angle
    }

    /// Returns the lowest visibility score of the three landmarks.
    ///
    /// Landmarks without a score count as fully visible.
    pub fn visibility(&self, pose: &Pose) -> f32 {
        self.indices()
            .iter()
            .map(|&idx| pose.get(idx).visibility().unwrap_or(1.0))
            .fold(1.0, f32::min)
    }
}

/// Picks the side of the body that is better visible for the joints returned by `joints`.
///
/// Exercises filmed from the side usually have one half of the body occluded, so measuring the
/// near side gives far more stable angles. Ties go to the left side.
pub fn more_visible_side(pose: &Pose, joints: impl Fn(Side) -> JointTriplet) -> Side {
    let left = joints(Side::Left).visibility(pose);
    let right = joints(Side::Right).visibility(pose);
    if right > left {
        Side::Right
    } else {
        Side::Left
    }
}
