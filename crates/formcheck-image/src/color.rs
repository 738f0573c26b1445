use std::fmt;

use embedded_graphics::{pixelcolor::raw::RawU32, prelude::PixelColor};

/// An sRGB color with straight (non-premultiplied) 8-bit alpha.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    /// Transparent black, the initial color of every pixel.
    pub const NONE: Self = Self::from_rgba8(0, 0, 0, 0);
    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);
    pub const RED: Self = Self::from_rgb8(255, 0, 0);
    pub const GREEN: Self = Self::from_rgb8(0, 255, 0);
    pub const BLUE: Self = Self::from_rgb8(0, 0, 255);

    /// Creates an opaque color.
    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, u8::MAX)
    }

    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub const fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn a(&self) -> u8 {
        self.0[3]
    }

    /// Returns this color with its alpha channel replaced by `a`.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::from_rgba8(self.r(), self.g(), self.b(), a)
    }

    /// Composites `self` over `dest` ("source over" operator).
    ///
    /// Blending happens directly on the sRGB values, which is what most overlay code expects.
    pub fn over(self, dest: Color) -> Color {
        let sa = f32::from(self.a()) / 255.0;
        let da = f32::from(dest.a()) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Color::NONE;
        }

        let mix = |s: u8, d: u8| {
            let c = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        Color([
            mix(self.r(), dest.r()),
            mix(self.g(), dest.g()),
            mix(self.b(), dest.b()),
            (out_a * 255.0).round() as u8,
        ])
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "Color(#{r:02x}{g:02x}{b:02x}, alpha {a})")
    }
}

// Lets `Color` be used directly as the pixel type of the draw target.
impl PixelColor for Color {
    type Raw = RawU32;
}
