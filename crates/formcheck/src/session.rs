//! Per-video processing state.

use formcheck_image::Image;

use crate::annotate::Annotator;
use crate::exercise::{Exercise, ExerciseKind, Metrics, Tracker, TrackingOptions, UnknownExercise};
use crate::info::ExerciseInfo;
use crate::pose::PoseEstimator;
use crate::timer::Timer;

/// Owns everything needed to process the frames of one exercise video.
///
/// Frames must be passed to [`Session::process`] in order. Nothing is shared between sessions,
/// so independent videos can be processed on different threads.
pub struct Session<E> {
    estimator: E,
    tracker: Tracker,
    info: ExerciseInfo,
    annotator: Annotator,
    frames: u64,
    t_estimate: Timer,
    t_track: Timer,
    t_annotate: Timer,
}

impl<E: PoseEstimator> Session<E> {
    pub fn new(kind: ExerciseKind, estimator: E, options: TrackingOptions) -> Self {
        log::debug!("starting {kind} session (options: {options:?})");
        let annotator = Annotator {
            skeleton: Some(options.min_visibility),
            ..Annotator::default()
        };
        Self {
            estimator,
            tracker: Tracker::new(kind, options),
            info: ExerciseInfo::of(kind),
            annotator,
            frames: 0,
            t_estimate: Timer::new("estimate"),
            t_track: Timer::new("track"),
            t_annotate: Timer::new("annotate"),
        }
    }

    /// Creates a session for the exercise with identifier `id` (eg. `hammer_curl`).
    pub fn from_id(
        id: &str,
        estimator: E,
        options: TrackingOptions,
    ) -> Result<Self, UnknownExercise> {
        Ok(Self::new(id.parse()?, estimator, options))
    }

    pub fn set_annotator(&mut self, annotator: Annotator) {
        self.annotator = annotator;
    }

    pub fn kind(&self) -> ExerciseKind {
        self.tracker.kind()
    }

    pub fn info(&self) -> &ExerciseInfo {
        &self.info
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    /// Returns the number of frames processed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn metrics(&self) -> Metrics {
        self.tracker.metrics()
    }

    /// Runs pose estimation on `frame`, updates the exercise state, and draws the resulting
    /// metrics onto `frame`.
    pub fn process(&mut self, frame: &mut Image) -> Metrics {
        self.frames += 1;
        let pose = self.t_estimate.time(|| self.estimator.estimate(frame));
        if pose.is_none() {
            log::trace!("no pose in frame {}", self.frames);
        }
        let metrics = self.t_track.time(|| self.tracker.update(pose.as_ref()));
        self.t_annotate.time(|| {
            self.annotator
                .annotate(frame, &self.info, &metrics, pose.as_ref());
        });
        metrics
    }

    /// Resets the exercise state, as if no frame had been processed yet.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.frames = 0;
    }

    pub fn timers(&self) -> [&Timer; 3] {
        [&self.t_estimate, &self.t_track, &self.t_annotate]
    }
}
