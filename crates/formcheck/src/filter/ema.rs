//! Exponential smoothing.

use super::Filter;

/// Exponential moving average: each output is `alpha * input + (1 - alpha) * previous output`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    alpha: f32,
}

impl Ema {
    /// Creates a filter with smoothing factor `alpha`.
    ///
    /// Larger values follow the input more closely; `1.0` passes values through unchanged and
    /// `0.0` holds the first value forever.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is outside of `0.0..=1.0`.
    pub fn new(alpha: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "EMA alpha must be in range 0.0..=1.0, got {alpha}"
        );
        Self { alpha }
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Per-signal state of an [`Ema`].
#[derive(Debug, Default, Clone)]
pub struct EmaState {
    prev: Option<f32>,
}

impl Filter<f32> for Ema {
    type State = EmaState;

    fn filter(&self, state: &mut EmaState, value: f32) -> f32 {
        let out = match state.prev {
            Some(prev) => prev + self.alpha * (value - prev),
            None => value,
        };
        state.prev = Some(out);
        out
    }
}
