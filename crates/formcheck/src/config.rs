//! Runtime configuration.

use std::env::{self, VarError};

use once_cell::sync::Lazy;

use crate::exercise::{TrackingOptions, DEFAULT_MIN_VISIBILITY};
use crate::filter::ema::Ema;

const DEFAULT_CANVAS: (u32, u32) = (640, 480);

const VAR_MIN_VISIBILITY: &str = "FORMCHECK_MIN_VISIBILITY";
const VAR_SMOOTHING: &str = "FORMCHECK_SMOOTHING";
const VAR_CANVAS: &str = "FORMCHECK_CANVAS";

static ENV_CONFIG: Lazy<Config> = Lazy::new(|| {
    let config = Config::from_lookup(|name| match env::var(name) {
        Ok(v) => Some(v),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(s)) => {
            log::warn!(
                "ignoring non-unicode value set for `{name}` variable: {}",
                s.to_string_lossy()
            );
            None
        }
    });
    log::debug!("using {config:?}");
    config
});

/// Settings shared by the library and the `formcheck` binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub min_visibility: f32,
    pub smoothing: Option<Ema>,
    /// Width and height of the blank frame used for recorded frames without an image.
    pub canvas: (u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
            smoothing: None,
            canvas: DEFAULT_CANVAS,
        }
    }
}

impl Config {
    /// Returns the default configuration, overridden by any `FORMCHECK_*` environment variables.
    ///
    /// The environment is only read once. Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        *ENV_CONFIG
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |name: &'static str, apply: &mut dyn FnMut(&str) -> bool| {
            if let Some(value) = lookup(name) {
                if !apply(value.trim()) {
                    log::warn!("invalid value set for `{name}` variable: '{value}'; ignoring");
                }
            }
        };

        read(VAR_MIN_VISIBILITY, &mut |v| match v.parse::<f32>() {
            Ok(vis) if (0.0..=1.0).contains(&vis) => {
                config.min_visibility = vis;
                true
            }
            _ => false,
        });
        read(VAR_SMOOTHING, &mut |v| match v {
            "" | "off" => {
                config.smoothing = None;
                true
            }
            _ => match v.parse::<f32>() {
                Ok(alpha) if (0.0..=1.0).contains(&alpha) => {
                    config.smoothing = Some(Ema::new(alpha));
                    true
                }
                _ => false,
            },
        });
        read(VAR_CANVAS, &mut |v| match parse_size(v) {
            Some(size) => {
                config.canvas = size;
                true
            }
            None => false,
        });

        config
    }

    pub fn tracking_options(&self) -> TrackingOptions {
        TrackingOptions {
            min_visibility: self.min_visibility,
            smoothing: self.smoothing,
        }
    }
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let (w, h) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    if w == 0 || h == 0 {
        return None;
    }
    Some((w, h))
}
