//! Body landmarks as returned by a pose model.

type Position = [f32; 3];

/// A fixed-size, indexable list of [`Landmark`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    points: Box<[Landmark]>,
}

impl Landmarks {
    /// Creates `len` landmarks at the origin, without visibility scores.
    pub fn new(len: usize) -> Self {
        Self {
            points: vec![Landmark::new([0.0; 3]); len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.points.iter().copied()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, landmark: Landmark) {
        self.points[index] = landmark;
    }
}

impl FromIterator<Landmark> for Landmarks {
    fn from_iter<T: IntoIterator<Item = Landmark>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// A body landmark.
///
/// X and Y are normalized to the input frame, so `[0.0, 0.0]` is the top left corner and
/// `[1.0, 1.0]` the bottom right corner. Z is relative depth and is not used for angle
/// measurement.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Landmark {
    pos: Position,
    visibility: Option<f32>,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self {
            pos: position,
            visibility: None,
        }
    }

    pub fn with_visibility(self, visibility: f32) -> Self {
        Self {
            visibility: Some(visibility),
            ..self
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }

    /// Returns the likelihood of the landmark being visible (not occluded), if the model reports
    /// it.
    #[inline]
    pub fn visibility(&self) -> Option<f32> {
        self.visibility
    }

    /// Returns whether this landmark is confident enough to measure with.
    ///
    /// Landmarks without a visibility score are assumed to be visible. Non-finite coordinates are
    /// never usable.
    pub fn is_usable(&self, min_visibility: f32) -> bool {
        self.pos.iter().all(|c| c.is_finite())
            && self.visibility.map_or(true, |vis| vis >= min_visibility)
    }
}
