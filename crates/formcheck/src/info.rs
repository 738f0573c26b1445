//! Descriptive information about exercises.

use crate::exercise::ExerciseKind;

/// Display name and workout targets of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseInfo {
    pub name: &'static str,
    /// Target reps per set.
    pub reps: u32,
    /// Target number of sets.
    pub sets: u32,
}

impl ExerciseInfo {
    pub fn of(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Squat => Self {
                name: "Squat",
                reps: 15,
                sets: 3,
            },
            ExerciseKind::HammerCurl => Self {
                name: "Hammer Curl",
                reps: 10,
                sets: 3,
            },
            ExerciseKind::PushUp => Self {
                name: "Push Up",
                reps: 12,
                sets: 3,
            },
        }
    }

    /// Returns the 1-based set that `reps` total repetitions fall into.
    ///
    /// Stays at the last set once all sets are completed.
    pub fn current_set(&self, reps: u32) -> u32 {
        (reps / self.reps.max(1) + 1).min(self.sets)
    }
}
