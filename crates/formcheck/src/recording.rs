//! Replay of pre-computed pose landmarks.
//!
//! A recording is a JSON-lines file with one object per frame:
//!
//! ```text
//! {"image": "frames/0001.png", "landmarks": [[0.51, 0.22, -0.1, 0.99], ...]}
//! {"landmarks": null}
//! ```
//!
//! `image` is optional and relative to the recording file. `landmarks` holds the 33 pose
//! landmarks as `[x, y, z]` or `[x, y, z, visibility]`, or is `null` (or missing) if no person
//! was found in the frame.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    vec,
};

use anyhow::{bail, Context};
use formcheck_image::{Color, Image};
use serde::Deserialize;

use crate::landmark::{Landmark, Landmarks};
use crate::pose::{Pose, PoseEstimator};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Line {
    #[serde(default)]
    image: Option<PathBuf>,
    #[serde(default)]
    landmarks: Option<Vec<Point>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Point {
    WithVisibility([f32; 4]),
    Plain([f32; 3]),
}

impl From<Point> for Landmark {
    fn from(point: Point) -> Self {
        match point {
            Point::WithVisibility([x, y, z, vis]) => Landmark::new([x, y, z]).with_visibility(vis),
            Point::Plain(pos) => Landmark::new(pos),
        }
    }
}

/// A single recorded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Absolute (or working-directory-relative) path of the frame's image.
    pub image: Option<PathBuf>,
    pub pose: Option<Pose>,
}

/// A sequence of recorded frames, loaded into memory.
#[derive(Debug, Clone)]
pub struct Recording {
    frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Loads a recording from a JSON-lines file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
        let base = path.parent().unwrap_or(Path::new(""));
        Self::parse(BufReader::new(file), base)
            .with_context(|| format!("failed to load recording '{}'", path.display()))
    }

    /// Parses a recording, resolving image paths relative to `base`.
    ///
    /// Empty lines are skipped.
    pub fn parse<R: BufRead>(reader: R, base: &Path) -> anyhow::Result<Self> {
        let mut frames = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = parse_line(&line, base).with_context(|| format!("line {}", i + 1))?;
            frames.push(frame);
        }
        log::debug!("loaded recording with {} frames", frames.len());
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    /// Splits the recording into the frame images and a [`PoseEstimator`] replaying the recorded
    /// poses.
    ///
    /// Frames without an image are blank `canvas`-sized images. The estimator returns the
    /// recorded poses in order, regardless of the image it is handed, so both halves have to be
    /// consumed in lockstep.
    pub fn into_replay(self, canvas: (u32, u32)) -> (Frames, Replay) {
        let (images, poses): (Vec<_>, Vec<_>) = self
            .frames
            .into_iter()
            .map(|frame| (frame.image, frame.pose))
            .unzip();
        (
            Frames {
                images: images.into_iter(),
                canvas,
            },
            Replay {
                poses: poses.into_iter(),
            },
        )
    }
}

fn parse_line(line: &str, base: &Path) -> anyhow::Result<RecordedFrame> {
    let line: Line = serde_json::from_str(line)?;
    let pose = match line.landmarks {
        Some(points) => {
            let landmarks: Landmarks = points.into_iter().map(Landmark::from).collect();
            Some(Pose::new(landmarks)?)
        }
        None => None,
    };
    let image = match line.image {
        Some(path) if path.as_os_str().is_empty() => bail!("empty image path"),
        Some(path) => Some(base.join(path)),
        None => None,
    };
    Ok(RecordedFrame { image, pose })
}

/// Iterator over the images of a recording, loading them from disk on demand.
pub struct Frames {
    images: vec::IntoIter<Option<PathBuf>>,
    canvas: (u32, u32),
}

impl Iterator for Frames {
    type Item = anyhow::Result<Image>;

    fn next(&mut self) -> Option<Self::Item> {
        let image = match self.images.next()? {
            Some(path) => Image::load(path),
            None => {
                let mut image = Image::new(self.canvas.0, self.canvas.1);
                image.clear(Color::BLACK);
                Ok(image)
            }
        };
        Some(image)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.images.size_hint()
    }
}

impl ExactSizeIterator for Frames {}

/// A [`PoseEstimator`] that returns recorded poses.
pub struct Replay {
    poses: vec::IntoIter<Option<Pose>>,
}

impl PoseEstimator for Replay {
    fn estimate(&mut self, _frame: &Image) -> Option<Pose> {
        self.poses.next().flatten()
    }
}
