use std::ops::RangeInclusive;

use crate::adapter::JointTriplet;
use crate::pose::{Pose, Side};

use super::{Exercise, ExerciseKind, Limb, Metrics, Thresholds, TrackingOptions};

/// Allowed range of the upper arm angle (hip, shoulder, elbow) during a curl.
///
/// An elbow that drifts forward or away from the torso turns the curl into a front raise, which
/// shows up as a growing angle at the shoulder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBand {
    min: f32,
    max: f32,
}

impl ToleranceBand {
    /// Creates a band accepting angles in `range`, in degrees.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty.
    pub fn new(range: RangeInclusive<f32>) -> Self {
        let (min, max) = range.into_inner();
        assert!(min <= max, "empty tolerance band {min}..={max}");
        Self { min, max }
    }

    pub fn contains(&self, angle: f32) -> bool {
        (self.min..=self.max).contains(&angle)
    }
}

impl Default for ToleranceBand {
    fn default() -> Self {
        Self::new(0.0..=35.0)
    }
}

struct Arm {
    side: Side,
    limb: Limb,
    tolerance: ToleranceBand,
}

impl Arm {
    fn update(&mut self, pose: &Pose, min_visibility: f32) {
        match JointTriplet::elbow(self.side).measure(pose, min_visibility) {
            Some(angle) => self.limb.push(angle),
            None => log::trace!("{} elbow not visible", self.side),
        }

        if let Some(angle) = JointTriplet::shoulder(self.side).measure(pose, min_visibility) {
            let warning = if self.tolerance.contains(angle) {
                None
            } else if angle > self.tolerance.max {
                Some(format!("Keep your {} elbow close to your body", self.side))
            } else {
                Some(format!("Raise your {} upper arm slightly", self.side))
            };
            self.limb.set_warning(warning);
        }
    }
}

/// Counts hammer curls on both arms independently.
pub struct HammerCurl {
    min_visibility: f32,
    arms: [Arm; 2],
}

impl HammerCurl {
    pub fn new(options: TrackingOptions) -> Self {
        let arm = |side| Arm {
            side,
            limb: Limb::new(Some(side), Thresholds::HAMMER_CURL, &options),
            tolerance: ToleranceBand::default(),
        };
        Self {
            min_visibility: options.min_visibility,
            arms: Side::BOTH.map(arm),
        }
    }

    /// Sets the upper arm tolerance band of one arm.
    pub fn set_tolerance(&mut self, side: Side, band: ToleranceBand) {
        self.arm_mut(side).tolerance = band;
    }

    fn arm_mut(&mut self, side: Side) -> &mut Arm {
        match side {
            Side::Left => &mut self.arms[0],
            Side::Right => &mut self.arms[1],
        }
    }
}

impl Exercise for HammerCurl {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::HammerCurl
    }

    fn update(&mut self, pose: Option<&Pose>) -> Metrics {
        if let Some(pose) = pose {
            for arm in &mut self.arms {
                arm.update(pose, self.min_visibility);
            }
        }

        self.metrics()
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            exercise: ExerciseKind::HammerCurl,
            limbs: self.arms.iter().map(|arm| arm.limb.metrics()).collect(),
        }
    }

    fn reset(&mut self) {
        for arm in &mut self.arms {
            arm.limb.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Stage;
    use crate::landmark::{Landmark, Landmarks};
    use crate::pose::{LandmarkIdx, NUM_LANDMARKS};

    #[derive(Clone, Copy)]
    struct ArmPose {
        /// Angle at the elbow.
        elbow: f32,
        /// Angle between torso and upper arm.
        shoulder: f32,
        visible: bool,
    }

    fn arm(elbow: f32) -> ArmPose {
        ArmPose {
            elbow,
            shoulder: 10.0,
            visible: true,
        }
    }

    fn rotate(v: [f32; 2], degrees: f32) -> [f32; 2] {
        let (s, c) = degrees.to_radians().sin_cos();
        [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
    }

    fn curl_pose(left: ArmPose, right: ArmPose) -> Pose {
        let mut landmarks = Landmarks::new(NUM_LANDMARKS);
        for i in 0..NUM_LANDMARKS {
            landmarks.set(i, Landmark::new([0.5, 0.1, 0.0]).with_visibility(0.9));
        }

        for (side, arm, x) in [(Side::Left, left, 0.6), (Side::Right, right, 0.4)] {
            let vis = if arm.visible { 0.9 } else { 0.1 };
            let shoulder = [x, 0.3];
            let hip = [x, 0.6];
            // Shoulder->hip points down; the upper arm is that direction rotated by `shoulder`.
            let upper = rotate([0.0, 0.2], arm.shoulder);
            let elbow = [shoulder[0] + upper[0], shoulder[1] + upper[1]];
            // Elbow->shoulder is `-upper`; the forearm is that rotated by the elbow angle.
            let fore = rotate([-upper[0], -upper[1]], arm.elbow);
            let wrist = [elbow[0] + fore[0], elbow[1] + fore[1]];
            for (idx, [px, py]) in [
                (LandmarkIdx::hip(side), hip),
                (LandmarkIdx::shoulder(side), shoulder),
                (LandmarkIdx::elbow(side), elbow),
                (LandmarkIdx::wrist(side), wrist),
            ] {
                landmarks.set(idx as usize, Landmark::new([px, py, 0.0]).with_visibility(vis));
            }
        }
        Pose::new(landmarks).unwrap()
    }

    #[test]
    fn arms_count_independently() {
        let mut curl = HammerCurl::new(TrackingOptions::default());
        let frames = [
            (arm(170.0), arm(170.0)),
            (arm(20.0), arm(100.0)),
            (arm(170.0), arm(100.0)),
            (arm(20.0), arm(20.0)),
            (arm(170.0), arm(165.0)),
        ];
        for (left, right) in frames {
            curl.update(Some(&curl_pose(left, right)));
        }

        let metrics = curl.metrics();
        let [left, right] = &metrics.limbs[..] else {
            panic!("expected two limbs")
        };
        assert_eq!(left.side, Some(Side::Left));
        assert_eq!(left.count, 2);
        assert_eq!(right.side, Some(Side::Right));
        assert_eq!(right.count, 1);
        assert_eq!(metrics.reps(), 1);
        assert_eq!(left.stage, Stage::Up);
        assert!(left.progress.unwrap() < 0.01);
    }

    #[test]
    fn occluded_arm_keeps_state() {
        let mut curl = HammerCurl::new(TrackingOptions::default());
        curl.update(Some(&curl_pose(arm(20.0), arm(20.0))));

        let hidden = ArmPose {
            visible: false,
            ..arm(170.0)
        };
        let metrics = curl.update(Some(&curl_pose(arm(170.0), hidden)));
        assert_eq!(metrics.limbs[0].count, 1);
        assert_eq!(metrics.limbs[1].count, 0);
        assert_eq!(metrics.limbs[1].stage, Stage::Down);
        assert!((metrics.limbs[1].angle.unwrap() - 20.0).abs() < 0.01);
    }

    #[test]
    fn elbow_drift_warning() {
        let mut curl = HammerCurl::new(TrackingOptions::default());
        let drifting = ArmPose {
            shoulder: 60.0,
            ..arm(90.0)
        };
        let metrics = curl.update(Some(&curl_pose(arm(90.0), drifting)));
        assert_eq!(metrics.limbs[0].warning, None);
        assert_eq!(
            metrics.limbs[1].warning.as_deref(),
            Some("Keep your right elbow close to your body")
        );
        assert_eq!(metrics.warnings().count(), 1);

        // A frame without a pose keeps the warning.
        assert_eq!(curl.update(None).warnings().count(), 1);

        // Correcting the form clears it.
        let metrics = curl.update(Some(&curl_pose(arm(90.0), arm(90.0))));
        assert_eq!(metrics.warnings().count(), 0);
    }

    #[test]
    fn side_specific_tolerance() {
        let mut curl = HammerCurl::new(TrackingOptions::default());
        curl.set_tolerance(Side::Left, ToleranceBand::new(0.0..=70.0));
        let drifting = ArmPose {
            shoulder: 60.0,
            ..arm(90.0)
        };
        let metrics = curl.update(Some(&curl_pose(drifting, drifting)));
        assert_eq!(metrics.limbs[0].warning, None);
        assert!(metrics.limbs[1].warning.is_some());

        curl.reset();
        assert_eq!(curl.metrics().warnings().count(), 0);
    }

    #[test]
    fn band_bounds_are_inclusive() {
        let band = ToleranceBand::new(20.0..=35.0);
        assert!(band.contains(20.0));
        assert!(band.contains(35.0));
        assert!(!band.contains(35.5));
        assert!(!band.contains(19.0));

        let mut curl = HammerCurl::new(TrackingOptions::default());
        curl.set_tolerance(Side::Left, band);
        let metrics = curl.update(Some(&curl_pose(arm(90.0), arm(90.0))));
        assert_eq!(
            metrics.limbs[0].warning.as_deref(),
            Some("Raise your left upper arm slightly")
        );
        assert_eq!(metrics.limbs[1].warning, None);
    }

    #[test]
    #[should_panic]
    fn empty_band() {
        ToleranceBand::new(40.0..=10.0);
    }
}
