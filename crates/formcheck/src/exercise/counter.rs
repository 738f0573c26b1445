//! The repetition state machine shared by all exercises.

use std::fmt;

/// The phase of a repetition a limb is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// No angle has crossed either threshold yet.
    #[default]
    Unset,
    /// The joint is extended past the upper threshold.
    Up,
    /// The joint is flexed past the lower threshold.
    Down,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Unset => "-",
            Stage::Up => "up",
            Stage::Down => "down",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The hysteresis band of a [`RepCounter`], in degrees.
///
/// A joint enters [`Stage::Down`] below `low` and [`Stage::Up`] above `high`. Angles in between
/// never change the stage, so jitter around either threshold cannot produce extra reps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    low: f32,
    high: f32,
}

impl Thresholds {
    /// Knee angle.
    pub const SQUAT: Self = Self {
        low: 90.0,
        high: 160.0,
    };

    /// Elbow angle.
    pub const HAMMER_CURL: Self = Self {
        low: 30.0,
        high: 150.0,
    };

    /// Elbow angle.
    pub const PUSH_UP: Self = Self {
        low: 90.0,
        high: 160.0,
    };

    /// Creates a custom band.
    ///
    /// Both thresholds must be within 0° and 180°, and `low` must be strictly less than `high`.
    pub fn new(low: f32, high: f32) -> Result<Self, InvalidThresholds> {
        let in_range = |t: f32| (0.0..=180.0).contains(&t);
        if !(in_range(low) && in_range(high) && low < high) {
            return Err(InvalidThresholds { low, high });
        }
        Ok(Self { low, high })
    }

    #[inline]
    pub fn low(&self) -> f32 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> f32 {
        self.high
    }

    /// Maps `angle` linearly onto 0.0 (at `high`, extended) to 1.0 (at `low`, flexed).
    ///
    /// Angles outside of the band are clamped.
    pub fn progress(&self, angle: f32) -> f32 {
        ((self.high - angle) / (self.high - self.low)).clamp(0.0, 1.0)
    }
}

/// Error returned by [`Thresholds::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidThresholds {
    low: f32,
    high: f32,
}

impl fmt::Display for InvalidThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid thresholds {}°..{}° (need 0 <= low < high <= 180)",
            self.low, self.high
        )
    }
}

impl std::error::Error for InvalidThresholds {}

/// Brings a measured angle into the range 0° to 180°.
///
/// Returns [`None`] for NaN, which cannot be classified.
pub fn sanitize(angle: f32) -> Option<f32> {
    if angle.is_nan() {
        None
    } else {
        Some(angle.clamp(0.0, 180.0))
    }
}

/// Counts repetitions of a single joint from a stream of angles.
#[derive(Debug, Clone)]
pub struct RepCounter {
    thresholds: Thresholds,
    stage: Stage,
    count: u32,
    last_angle: Option<f32>,
}

impl RepCounter {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            stage: Stage::Unset,
            count: 0,
            last_angle: None,
        }
    }

    /// Feeds the angle measured in the current frame to the state machine.
    ///
    /// Returns `true` if this angle completed a repetition (a [`Stage::Down`] to [`Stage::Up`]
    /// transition). NaN angles are ignored entirely.
    pub fn push(&mut self, angle: f32) -> bool {
        let Some(angle) = sanitize(angle) else {
            log::trace!("ignoring NaN angle");
            return false;
        };
        self.last_angle = Some(angle);

        let next = match self.stage {
            Stage::Unset | Stage::Up if angle < self.thresholds.low => Stage::Down,
            Stage::Unset | Stage::Down if angle > self.thresholds.high => Stage::Up,
            stage => stage,
        };
        if next == self.stage {
            return false;
        }

        log::trace!("{} -> {} at {angle:.1}°", self.stage, next);
        let completed = self.stage == Stage::Down;
        self.stage = next;
        if completed {
            self.count += 1;
        }
        completed
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The most recent angle passed to [`RepCounter::push`], after clamping.
    #[inline]
    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    #[inline]
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Progress of the current movement, see [`Thresholds::progress`].
    pub fn progress(&self) -> Option<f32> {
        self.last_angle.map(|angle| self.thresholds.progress(angle))
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.thresholds);
    }
}
