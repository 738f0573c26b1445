//! Exercise trackers.
//!
//! Every supported exercise is a small state machine over one or two joint angles, fed with one
//! [`Pose`] per frame. The trackers share the [`Exercise`] interface and are dispatched through
//! the [`Tracker`] enum, which is what a session holds on to.

mod counter;
mod hammer_curl;
mod push_up;
mod squat;

use std::{fmt, str::FromStr};

pub use counter::{sanitize, InvalidThresholds, RepCounter, Stage, Thresholds};
pub use hammer_curl::{HammerCurl, ToleranceBand};
pub use push_up::PushUp;
pub use squat::Squat;

use crate::filter::{ema::Ema, SimpleFilter};
use crate::pose::{Pose, Side};

/// Default minimum landmark visibility for a joint to be measured.
pub const DEFAULT_MIN_VISIBILITY: f32 = 0.5;

/// The supported exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExerciseKind {
    Squat,
    HammerCurl,
    PushUp,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 3] = [
        ExerciseKind::Squat,
        ExerciseKind::HammerCurl,
        ExerciseKind::PushUp,
    ];

    /// Returns the identifier used to select this exercise (eg. on the command line).
    pub fn id(self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::HammerCurl => "hammer_curl",
            ExerciseKind::PushUp => "push_up",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExerciseKind {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownExercise { id: s.to_string() })
    }
}

/// Error returned when parsing an unsupported exercise identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExercise {
    id: String,
}

impl UnknownExercise {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for UnknownExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown exercise '{}' (expected one of: ", self.id)?;
        for (i, kind) in ExerciseKind::ALL.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            f.write_str(kind.id())?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for UnknownExercise {}

/// Parameters shared by all trackers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingOptions {
    /// Landmarks with a lower visibility score are treated as missing.
    pub min_visibility: f32,
    /// Smooths measured angles before they reach the state machine.
    pub smoothing: Option<Ema>,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
            smoothing: None,
        }
    }
}

/// The state of a single tracked limb after a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LimbMetrics {
    /// [`None`] for exercises that track the body as a whole.
    pub side: Option<Side>,
    pub count: u32,
    pub stage: Stage,
    /// Most recent joint angle in degrees, if the joint has been seen yet.
    pub angle: Option<f32>,
    /// 0.0 (extended) to 1.0 (flexed), recomputed every frame from `angle`.
    pub progress: Option<f32>,
    pub warning: Option<String>,
}

impl fmt::Display for LimbMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(side) = self.side {
            write!(f, "{side}: ")?;
        }
        write!(f, "{} reps, stage {}", self.count, self.stage)?;
        if let Some(angle) = self.angle {
            write!(f, ", {angle:.0}°")?;
        }
        if let Some(warning) = &self.warning {
            write!(f, " ({warning})")?;
        }
        Ok(())
    }
}

/// Snapshot of an exercise's state.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub exercise: ExerciseKind,
    pub limbs: Vec<LimbMetrics>,
}

impl Metrics {
    /// Returns the number of reps completed by *every* tracked limb.
    pub fn reps(&self) -> u32 {
        self.limbs.iter().map(|limb| limb.count).min().unwrap_or(0)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.limbs.iter().filter_map(|limb| limb.warning.as_deref())
    }
}

/// Common interface of all exercise trackers.
pub trait Exercise {
    fn kind(&self) -> ExerciseKind;

    /// Processes the pose found in a frame.
    ///
    /// A frame without a pose (or with the relevant joints not visible) leaves the tracker
    /// unchanged; the returned metrics then repeat the previous frame's values.
    fn update(&mut self, pose: Option<&Pose>) -> Metrics;

    /// Returns the current metrics without processing a frame.
    fn metrics(&self) -> Metrics;

    /// Resets all counters, stages and warnings.
    fn reset(&mut self);
}

/// A tracker for any of the supported exercises.
pub enum Tracker {
    Squat(Squat),
    HammerCurl(HammerCurl),
    PushUp(PushUp),
}

impl Tracker {
    pub fn new(kind: ExerciseKind, options: TrackingOptions) -> Self {
        match kind {
            ExerciseKind::Squat => Tracker::Squat(Squat::new(options)),
            ExerciseKind::HammerCurl => Tracker::HammerCurl(HammerCurl::new(options)),
            ExerciseKind::PushUp => Tracker::PushUp(PushUp::new(options)),
        }
    }

    /// Creates a tracker for the exercise with identifier `id`.
    pub fn from_id(id: &str, options: TrackingOptions) -> Result<Self, UnknownExercise> {
        Ok(Self::new(id.parse()?, options))
    }

    fn as_exercise(&self) -> &dyn Exercise {
        match self {
            Tracker::Squat(e) => e,
            Tracker::HammerCurl(e) => e,
            Tracker::PushUp(e) => e,
        }
    }

    fn as_exercise_mut(&mut self) -> &mut dyn Exercise {
        match self {
            Tracker::Squat(e) => e,
            Tracker::HammerCurl(e) => e,
            Tracker::PushUp(e) => e,
        }
    }
}

impl Exercise for Tracker {
    fn kind(&self) -> ExerciseKind {
        self.as_exercise().kind()
    }

    fn update(&mut self, pose: Option<&Pose>) -> Metrics {
        self.as_exercise_mut().update(pose)
    }

    fn metrics(&self) -> Metrics {
        self.as_exercise().metrics()
    }

    fn reset(&mut self) {
        self.as_exercise_mut().reset()
    }
}

/// A [`RepCounter`] plus everything else tracked per limb.
struct Limb {
    side: Option<Side>,
    counter: RepCounter,
    smoothing: Option<SimpleFilter<Ema>>,
    warning: Option<String>,
}

impl Limb {
    fn new(side: Option<Side>, thresholds: Thresholds, options: &TrackingOptions) -> Self {
        Self {
            side,
            counter: RepCounter::new(thresholds),
            smoothing: options.smoothing.map(SimpleFilter::new),
            warning: None,
        }
    }

    fn push(&mut self, angle: f32) {
        let Some(mut angle) = sanitize(angle) else {
            return;
        };
        if let Some(filter) = &mut self.smoothing {
            angle = filter.filter(angle);
        }
        if self.counter.push(angle) {
            match self.side {
                Some(side) => log::debug!("{side} rep {}", self.counter.count()),
                None => log::debug!("rep {}", self.counter.count()),
            }
        }
    }

    fn set_warning(&mut self, warning: Option<String>) {
        if warning != self.warning {
            if let Some(warning) = &warning {
                log::debug!("warning: {warning}");
            }
            self.warning = warning;
        }
    }

    fn metrics(&self) -> LimbMetrics {
        LimbMetrics {
            side: self.side,
            count: self.counter.count(),
            stage: self.counter.stage(),
            angle: self.counter.last_angle(),
            progress: self.counter.progress(),
            warning: self.warning.clone(),
        }
    }

    fn reset(&mut self) {
        self.counter.reset();
        if let Some(filter) = &mut self.smoothing {
            filter.reset();
        }
        self.warning = None;
    }
}
