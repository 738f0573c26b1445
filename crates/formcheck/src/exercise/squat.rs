use crate::adapter::{more_visible_side, JointTriplet};
use crate::pose::Pose;

use super::{Exercise, ExerciseKind, Limb, Metrics, Thresholds, TrackingOptions};

/// Counts squats using the knee angle of the leg facing the camera.
pub struct Squat {
    min_visibility: f32,
    legs: Limb,
}

impl Squat {
    pub fn new(options: TrackingOptions) -> Self {
        Self {
            min_visibility: options.min_visibility,
            legs: Limb::new(None, Thresholds::SQUAT, &options),
        }
    }
}

impl Exercise for Squat {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Squat
    }

    fn update(&mut self, pose: Option<&Pose>) -> Metrics {
        if let Some(pose) = pose {
            let side = more_visible_side(pose, JointTriplet::knee);
            match JointTriplet::knee(side).measure(pose, self.min_visibility) {
                Some(angle) => self.legs.push(angle),
                None => log::trace!("{side} knee not visible, skipping frame"),
            }
        }

        self.metrics()
    }

    fn metrics(&self) -> Metrics {
        Metrics {
            exercise: ExerciseKind::Squat,
            limbs: vec![self.legs.metrics()],
        }
    }

    fn reset(&mut self) {
        self.legs.reset();
    }
}
