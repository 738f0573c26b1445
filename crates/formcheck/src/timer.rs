//! Performance measurement tools.

use std::{
    fmt,
    sync::Mutex,
    time::{Duration, Instant},
};

use itertools::Itertools;

use crate::filter::{ema::Ema, SimpleFilter};

const EMA_ALPHA: f32 = 0.3;

/// Measures and averages the time an operation takes.
///
/// Displaying a timer with `{}` prints the averaged timings and resets them.
pub struct Timer {
    name: &'static str,
    samples: Mutex<Samples>,
}

struct Samples {
    avg: SimpleFilter<Ema>,
    last: f32,
    count: usize,
}

impl Samples {
    fn new() -> Self {
        Self {
            avg: SimpleFilter::new(Ema::new(EMA_ALPHA)),
            last: 0.0,
            count: 0,
        }
    }
}

impl Timer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            samples: Mutex::new(Samples::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes `f`, recording the time it takes.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        f()
    }

    /// Starts timing an operation. The time is recorded when the returned guard is dropped.
    pub fn start(&self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    fn record(&self, elapsed: Duration) {
        let mut samples = self.samples.lock().unwrap();
        samples.last = samples.avg.filter(elapsed.as_secs_f32());
        samples.count += 1;
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let samples = std::mem::replace(&mut *self.samples.lock().unwrap(), Samples::new());
        write!(
            f,
            "{}: {}x{:.01}ms",
            self.name,
            samples.count,
            samples.last * 1000.0
        )
    }
}

/// Stops timing the operation when dropped.
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.record(self.start.elapsed());
    }
}

/// Logs the number of frames processed per second.
pub struct FpsCounter {
    name: String,
    frames: u32,
    start: Instant,
}

impl FpsCounter {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            frames: 0,
            start: Instant::now(),
        }
    }

    /// Counts a frame, and logs the frame rate once per second.
    pub fn tick(&mut self) {
        self.tick_with(std::iter::empty::<&Timer>());
    }

    /// Counts a frame, and logs the frame rate and the given timers once per second.
    pub fn tick_with<'a>(&mut self, timers: impl IntoIterator<Item = &'a Timer>) {
        self.frames += 1;
        if self.start.elapsed() < Duration::from_secs(1) {
            return;
        }

        let timers = timers.into_iter().join(", ");
        if timers.is_empty() {
            log::debug!("{}: {} FPS", self.name, self.frames);
        } else {
            log::debug!("{}: {} FPS ({timers})", self.name, self.frames);
        }
        self.frames = 0;
        self.start = Instant::now();
    }
}
