//! Exercise repetition counting and form feedback from body pose landmarks.
//!
//! Frames go through a [`PoseEstimator`][pose::PoseEstimator], the resulting pose is turned into
//! joint angles, and a per-exercise state machine counts repetitions and raises form warnings.
//! The results are then drawn back onto the frame.
//!
//! # Coordinates
//!
//! Landmark coordinates are normalized to the input frame: X points to the right and Y points
//! *down*, both in range 0.0 to 1.0 for points inside the frame. Z is only used for 3D angles and
//! has an arbitrary scale.
//!
//! # Environment Variables
//!
//! [`Config::from_env`][config::Config::from_env] reads the following variables:
//!
//! * `FORMCHECK_MIN_VISIBILITY`: minimum visibility score (0.0 to 1.0) a landmark needs to be
//!   used. Defaults to 0.5.
//! * `FORMCHECK_SMOOTHING`: enables exponential smoothing of joint angles with the given alpha
//!   value (0.0 to 1.0). Off by default.
//! * `FORMCHECK_CANVAS`: size of the blank frame used when a recording has no image for a frame,
//!   as `WIDTHxHEIGHT`. Defaults to `640x480`.

use log::LevelFilter;

pub mod adapter;
pub mod angle;
pub mod annotate;
pub mod config;
pub mod exercise;
pub mod filter;
pub mod info;
pub mod landmark;
pub mod playback;
pub mod pose;
pub mod recording;
pub mod session;
pub mod timer;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = if cfg!(debug_assertions) {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_CRATE_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// If `cfg!(debug_assertions)` is enabled, the calling crate and formcheck will log at *trace*
/// level. Otherwise, they will log at *debug* level. `RUST_LOG` overrides both.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
