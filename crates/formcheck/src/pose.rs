//! Full-body pose landmarks.
//!
//! The landmark topology is the 33-point BlazePose layout, which is what the common pose
//! estimation models output.

use std::fmt;

use formcheck_image::{draw, Color, Image};

use crate::landmark::{Landmark, Landmarks};

/// Number of landmarks in a [`Pose`].
pub const NUM_LANDMARKS: usize = 33;

/// How many frame sizes past the frame edges skeleton points are drawn at most.
const OFFSCREEN_LIMIT: f32 = 4.0;

/// A pose estimation model.
///
/// The model is treated as a black box: it is handed a frame and either finds a person in it or
/// doesn't.
pub trait PoseEstimator {
    /// Estimates the pose of the person in `frame`.
    ///
    /// Returns [`None`] if no person was found.
    fn estimate(&mut self, frame: &Image) -> Option<Pose>;
}

impl<F: FnMut(&Image) -> Option<Pose>> PoseEstimator for F {
    fn estimate(&mut self, frame: &Image) -> Option<Pose> {
        self(frame)
    }
}

/// The landmarks of a single person's body.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    landmarks: Landmarks,
}

impl Pose {
    /// Wraps a set of landmarks.
    ///
    /// Returns an error if `landmarks` does not contain exactly [`NUM_LANDMARKS`] entries.
    pub fn new(landmarks: Landmarks) -> Result<Self, WrongLandmarkCount> {
        if landmarks.len() != NUM_LANDMARKS {
            return Err(WrongLandmarkCount {
                count: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }

    #[inline]
    pub fn get(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks.get(idx as usize)
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Draws the body skeleton onto `image`.
    ///
    /// Bones with an endpoint below `min_visibility` are skipped.
    pub fn draw(&self, image: &mut Image, min_visibility: f32) {
        let (w, h) = (image.width() as f32, image.height() as f32);
        // Points far outside of the frame are pulled in so line rasterization can't overflow.
        let px = |v: f32, size: f32| {
            (v * size)
                .clamp(-OFFSCREEN_LIMIT * size, (OFFSCREEN_LIMIT + 1.0) * size)
                .round() as i32
        };
        let to_px = |lm: Landmark| (px(lm.x(), w), px(lm.y(), h));

        for &(a, b) in CONNECTIVITY {
            let (a, b) = (self.get(a), self.get(b));
            if !a.is_usable(min_visibility) || !b.is_usable(min_visibility) {
                continue;
            }
            let (ax, ay) = to_px(a);
            let (bx, by) = to_px(b);
            draw::line(image, ax, ay, bx, by)
                .color(Color::from_rgb8(245, 117, 66))
                .stroke_width(2);
        }

        for lm in self.landmarks.iter().skip(LandmarkIdx::LeftShoulder as usize) {
            if lm.is_usable(min_visibility) {
                let (x, y) = to_px(lm);
                draw::marker(image, x, y)
                    .color(Color::from_rgb8(245, 66, 230))
                    .size(7);
            }
        }
    }
}

/// Error returned by [`Pose::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongLandmarkCount {
    count: usize,
}

impl fmt::Display for WrongLandmarkCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {NUM_LANDMARKS} pose landmarks, got {}",
            self.count
        )
    }
}

impl std::error::Error for WrongLandmarkCount {}

/// Which side of the body a limb is on.
///
/// This is the person's side, not the image side: a person facing the camera has their left arm
/// on the right half of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIdx {
    pub fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftShoulder,
            Side::Right => Self::RightShoulder,
        }
    }

    pub fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftElbow,
            Side::Right => Self::RightElbow,
        }
    }

    pub fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftWrist,
            Side::Right => Self::RightWrist,
        }
    }

    pub fn hip(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftHip,
            Side::Right => Self::RightHip,
        }
    }

    pub fn knee(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftKnee,
            Side::Right => Self::RightKnee,
        }
    }

    pub fn ankle(side: Side) -> Self {
        match side {
            Side::Left => Self::LeftAnkle,
            Side::Right => Self::RightAnkle,
        }
    }
}

const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
        (LeftAnkle, LeftHeel),
        (LeftAnkle, LeftFootIndex),
        (RightAnkle, RightHeel),
        (RightAnkle, RightFootIndex),
    ]
};

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a pose with every landmark at the origin, then applies `overrides`.
    pub(crate) fn pose_with(overrides: &[(LandmarkIdx, [f32; 2])]) -> Pose {
        let mut landmarks = Landmarks::new(NUM_LANDMARKS);
        for i in 0..NUM_LANDMARKS {
            landmarks.set(i, Landmark::new([0.0, 0.0, 0.0]).with_visibility(1.0));
        }
        for &(idx, [x, y]) in overrides {
            landmarks.set(idx as usize, Landmark::new([x, y, 0.0]).with_visibility(1.0));
        }
        Pose::new(landmarks).unwrap()
    }

    #[test]
    fn rejects_wrong_count() {
        let err = Pose::new(Landmarks::new(21)).unwrap_err();
        assert_eq!(err.to_string(), "expected 33 pose landmarks, got 21");
    }

    #[test]
    fn side_lookup() {
        assert_eq!(LandmarkIdx::elbow(Side::Left), LandmarkIdx::LeftElbow);
        assert_eq!(LandmarkIdx::ankle(Side::Right), LandmarkIdx::RightAnkle);
        let pose = pose_with(&[(LandmarkIdx::RightKnee, [0.25, 0.75])]);
        assert_eq!(pose.get(LandmarkIdx::RightKnee).x(), 0.25);
    }

    #[test]
    fn draw_far_offscreen() {
        let pose = pose_with(&[
            (LandmarkIdx::LeftShoulder, [0.5, 0.2]),
            (LandmarkIdx::LeftElbow, [0.5, 0.4]),
            (LandmarkIdx::LeftWrist, [1.0e10, 0.5]),
            (LandmarkIdx::RightWrist, [-1.0e10, f32::MAX]),
        ]);
        let mut image = Image::new(64, 48);
        pose.draw(&mut image, 0.5);
        assert_ne!(image.get(32, 15), Color::NONE);
    }

    #[test]
    fn draw_skeleton() {
        let pose = pose_with(&[
            (LandmarkIdx::LeftShoulder, [0.2, 0.2]),
            (LandmarkIdx::LeftElbow, [0.8, 0.2]),
        ]);
        let mut image = Image::new(50, 50);
        pose.draw(&mut image, 0.5);
        // Somewhere on the upper arm.
        assert_ne!(image.get(25, 10), Color::NONE);
    }
}
