use crate::adapter::{more_visible_side, JointTriplet};
use crate::pose::Pose;

use super::{Exercise, ExerciseKind, Limb, Metrics, Thresholds, TrackingOptions};

/// Shoulder-hip-ankle angles below this mean the hips are sagging or piking.
const MIN_BODY_LINE: f32 = 150.0;

/// Counts push-ups using the elbow angle, and checks that the body stays straight.
pub struct PushUp {
    min_visibility: f32,
    arms: Limb,
}

impl PushUp {
    pub fn new(options: TrackingOptions) -> Self {
        Self {
            min_visibility: options.min_visibility,
            arms: Limb::new(None, Thresholds::PUSH_UP, &options),
        }
    }
}

impl Exercise for PushUp {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::PushUp
    }

    fn update(&mut self, pose: Option<&Pose>) -> Metrics {
        let Some(pose) = pose else {
            return self.metrics();
        };

        let side = more_visible_side(pose, JointTriplet::elbow);
        let Some(angle) = JointTriplet::elbow(side).measure(pose, self.min_visibility) else {
            log::trace!("{side} elbow not visible, skipping frame");
            return self.metrics();
        };
        self.arms.push(angle);

        // Only judged on frames that also moved the counter.
        if let Some(angle) = JointTriplet::body_line(side).measure(pose, self.min_visibility) {
            let warning = (angle < MIN_BODY_LINE).then(|| "Keep your body straight".to_string());
            self.arms.set_warning(warning);
        }

        self.metrics()
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            exercise: ExerciseKind::PushUp,
            limbs: vec![self.arms.metrics()],
        }
    }

    fn reset(&mut self) {
        self.arms.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::Stage;
    use crate::pose::tests::pose_with;
    use crate::pose::LandmarkIdx::*;

    /// Side view, facing left: shoulder at the top of the arm, body extending to the right.
    fn push_up_pose(elbow_bend: bool, hip_y: f32) -> Pose {
        let elbow = if elbow_bend { [0.4, 0.6] } else { [0.3, 0.6] };
        let wrist = if elbow_bend { [0.25, 0.6] } else { [0.3, 0.8] };
        pose_with(&[
            (LeftShoulder, [0.3, 0.4]),
            (LeftElbow, elbow),
            (LeftWrist, wrist),
            (LeftHip, [0.6, hip_y]),
            (LeftAnkle, [0.9, 0.6]),
        ])
    }

    #[test]
    fn counts_and_checks_body_line() {
        let mut push_up = PushUp::new(TrackingOptions::default());

        let metrics = push_up.update(Some(&push_up_pose(false, 0.5)));
        assert_eq!(metrics.limbs[0].stage, Stage::Up);
        assert_eq!(metrics.limbs[0].warning, None);

        let metrics = push_up.update(Some(&push_up_pose(true, 0.5)));
        assert_eq!(metrics.limbs[0].stage, Stage::Down);

        // Sagging hips.
        let metrics = push_up.update(Some(&push_up_pose(true, 0.75)));
        assert_eq!(
            metrics.limbs[0].warning.as_deref(),
            Some("Keep your body straight")
        );

        let metrics = push_up.update(Some(&push_up_pose(false, 0.5)));
        assert_eq!(metrics.reps(), 1);
        assert_eq!(metrics.limbs[0].warning, None);
    }

    #[test]
    fn body_line_needs_elbow_reading() {
        let mut push_up = PushUp::new(TrackingOptions::default());
        let before = push_up.update(Some(&push_up_pose(false, 0.5)));

        // Sagging hips, but the wrist sits on the elbow.
        let pose = pose_with(&[
            (LeftShoulder, [0.3, 0.4]),
            (LeftElbow, [0.3, 0.6]),
            (LeftWrist, [0.3, 0.6]),
            (LeftHip, [0.6, 0.75]),
            (LeftAnkle, [0.9, 0.6]),
        ]);
        assert_eq!(push_up.update(Some(&pose)), before);
        assert_eq!(before.limbs[0].warning, None);
    }
}
