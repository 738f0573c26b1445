//! Frame processing pipeline.
//!
//! [`run`] processes frames on the calling thread and hands the annotated results to a
//! [`FrameSink`] running on a dedicated render thread, so that slow sinks (eg. PNG encoding)
//! overlap with the processing of the next frame.

use std::{
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use formcheck_image::Image;
use pawawwewism::Worker;

use crate::exercise::Metrics;
use crate::pose::PoseEstimator;
use crate::session::Session;
use crate::timer::FpsCounter;

/// Number of annotated frames that may queue up in front of the sink.
const RENDER_QUEUE: usize = 2;

/// A processed frame, with metrics drawn onto it.
#[derive(Debug, Clone)]
pub struct AnnotatedFrame {
    /// 1-based position of the frame in the input.
    pub index: u64,
    pub image: Image,
    pub metrics: Metrics,
}

/// Receives annotated frames for display or storage.
pub trait FrameSink: Send + 'static {
    fn show(&mut self, frame: AnnotatedFrame);
}

impl<F: FnMut(AnnotatedFrame) + Send + 'static> FrameSink for F {
    fn show(&mut self, frame: AnnotatedFrame) {
        self(frame)
    }
}

/// Writes frames to a directory as numbered PNG files.
pub struct PngDirectory {
    dir: PathBuf,
}

impl PngDirectory {
    /// Creates `dir` (and its parents) if it does not exist yet.
    pub fn create<P: Into<PathBuf>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path_of(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame-{index:05}.png"))
    }
}

impl FrameSink for PngDirectory {
    fn show(&mut self, frame: AnnotatedFrame) {
        let path = self.path_of(frame.index);
        if let Err(e) = frame.image.save(&path) {
            log::error!("{e:#}");
        }
    }
}

/// A flag that asks [`run`] to stop before processing the next frame.
///
/// Clones share the same flag, so a clone can be moved into a sink, a signal handler or another
/// thread.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of frames processed by this run.
    pub frames: u64,
    /// Whether the run ended because of a [`StopSignal`].
    pub stopped: bool,
    /// Exercise state after the last frame.
    pub metrics: Metrics,
}

/// Processes `frames` in order and passes each annotated frame to `sink`.
///
/// Returns when `frames` is exhausted or `stop` is triggered, after `sink` has received every
/// processed frame. An error from the frame source ends the run and is returned.
pub fn run<E, I, S>(
    frames: I,
    session: &mut Session<E>,
    mut sink: S,
    stop: &StopSignal,
) -> anyhow::Result<Summary>
where
    E: PoseEstimator,
    I: IntoIterator<Item = anyhow::Result<Image>>,
    S: FrameSink,
{
    let mut render = Worker::builder()
        .name("render")
        .capacity(RENDER_QUEUE)
        .spawn(move |frame: AnnotatedFrame| sink.show(frame))?;

    let mut fps = FpsCounter::new("playback");
    let mut frames = frames.into_iter();
    let mut processed = 0;
    let mut stopped = false;
    loop {
        if stop.is_stopped() {
            log::debug!("stop requested after {processed} frames");
            stopped = true;
            break;
        }
        let Some(image) = frames.next() else { break };
        let mut image =
            image.with_context(|| format!("failed to read frame {}", processed + 1))?;

        let metrics = session.process(&mut image);
        processed += 1;
        render.send(AnnotatedFrame {
            index: session.frames(),
            image,
            metrics,
        });

        fps.tick_with(session.timers());
    }

    // Joins the render thread, so every frame has been shown once this returns.
    drop(render);

    Ok(Summary {
        frames: processed,
        stopped,
        metrics: session.metrics(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::exercise::{ExerciseKind, TrackingOptions};
    use crate::pose::Pose;

    type NoPose = fn(&Image) -> Option<Pose>;

    fn session() -> Session<NoPose> {
        fn no_pose(_: &Image) -> Option<Pose> {
            None
        }
        Session::new(ExerciseKind::Squat, no_pose as NoPose, TrackingOptions::default())
    }

    fn blank(n: usize) -> impl Iterator<Item = anyhow::Result<Image>> {
        (0..n).map(|_| Ok(Image::new(32, 32)))
    }

    #[test]
    fn stopped_before_start() {
        let stop = StopSignal::new();
        stop.stop();
        let summary = run(blank(3), &mut session(), |_: AnnotatedFrame| {}, &stop).unwrap();
        assert_eq!(summary.frames, 0);
        assert!(summary.stopped);
    }

    #[test]
    fn source_error_ends_run() {
        let seen = Arc::new(Mutex::new(0));
        let sink = {
            let seen = seen.clone();
            move |_: AnnotatedFrame| *seen.lock().unwrap() += 1
        };
        let frames = blank(2).chain([Err(anyhow::anyhow!("corrupt"))]).chain(blank(2));
        let err = run(frames, &mut session(), sink, &StopSignal::new()).unwrap_err();
        assert_eq!(format!("{err:#}"), "failed to read frame 3: corrupt");
        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn png_directory() {
        let dir = std::env::temp_dir().join(format!("formcheck-png-{}", std::process::id()));
        let mut sink = PngDirectory::create(&dir).unwrap();
        let mut session = session();
        let mut image = Image::new(16, 16);
        let metrics = session.process(&mut image);
        sink.show(AnnotatedFrame {
            index: 7,
            image: image.clone(),
            metrics,
        });

        let path = sink.path_of(7);
        assert!(path.ends_with("frame-00007.png"));
        assert_eq!(Image::load(&path).unwrap(), image);
        fs::remove_dir_all(&dir).ok();
    }
}
