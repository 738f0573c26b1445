//! Data filtering and smoothing.

pub mod ema;

/// A filter for values of type `V`.
///
/// Filters are split into the (immutable) filter parameters and a per-signal [`Filter::State`],
/// so that one set of parameters can drive several independent signals.
pub trait Filter<V> {
    type State: Default;

    /// Adds a new value to the filter, returning the filtered value.
    fn filter(&self, state: &mut Self::State, value: V) -> V;
}

/// Bundles a [`Filter`] with the state of a single `f32` signal.
pub struct SimpleFilter<F: Filter<f32>> {
    filter: F,
    state: F::State,
}

impl<F: Filter<f32>> SimpleFilter<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            state: F::State::default(),
        }
    }

    pub fn filter(&mut self, value: f32) -> f32 {
        self.filter.filter(&mut self.state, value)
    }

    /// Forgets all previously filtered values.
    pub fn reset(&mut self) {
        self.state = F::State::default();
    }
}
