//! Image buffers and overlay drawing.
//!
//! # Overview
//!
//! [`Image`] is an owned 8-bit sRGBA image. It is what frames are decoded into and what the
//! overlay code draws onto.
//!
//! A few primitive drawing operations are available in the [`draw`] module. They are meant for
//! annotating frames with text and simple shapes, not as a general purpose graphics library. All
//! of them clip against the image bounds, so drawing partially (or entirely) outside of an image is
//! not an error.

pub mod draw;

mod color;
mod rect;

#[cfg(test)]
mod tests;

use std::{fmt, path::Path};

use anyhow::Context;
use image::{ImageBuffer, Rgba, RgbaImage};

pub use color::Color;
pub use rect::Rect;

#[derive(Debug, Clone, Copy)]
enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            _ => anyhow::bail!(
                "invalid image path '{}' (must have one of the supported extensions)",
                path.display()
            ),
        }
    }

    fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// An owned RGBA image, 8 bits per channel.
#[derive(Clone, PartialEq)]
pub struct Image {
    buf: RgbaImage,
}

impl Image {
    /// Reads a PNG or JPEG file, picking the decoder from the file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        let data =
            std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        let buf = image::load_from_memory_with_format(&data, format.to_image_format())?.to_rgba8();
        log::trace!("loaded {}x{} image from '{}'", buf.width(), buf.height(), path.display());
        Ok(Self { buf })
    }

    /// Creates an image from raw RGBA8 pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `buf` does not contain exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, buf: &[u8]) -> Self {
        let expected_size = width as usize * height as usize * 4;
        assert_eq!(
            expected_size,
            buf.len(),
            "incorrect buffer size {} for {}x{} image (expected {} bytes)",
            buf.len(),
            width,
            height,
            expected_size,
        );

        Self {
            buf: ImageBuffer::from_vec(width, height, buf.to_vec())
                .expect("buffer size does not match image resolution"),
        }
    }

    /// Writes the image as PNG or JPEG, depending on the file extension of `path`.
    ///
    /// JPEG files drop the alpha channel.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        match ImageFormat::from_path(path)? {
            ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(self.buf.clone())
                .to_rgb8()
                .save(path),
            ImageFormat::Png => self.buf.save(path),
        }
        .with_context(|| format!("failed to save image to '{}'", path.display()))
    }

    /// Creates a `width` by `height` image filled with [`Color::NONE`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// The bounds of the image, with the top left corner at the origin.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(0, 0, self.width(), self.height())
    }

    /// Returns the color of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }

    /// Overwrites the pixel at `(x, y)`, ignoring the alpha of the existing pixel.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.buf[(x, y)] = Rgba(color.0);
    }

    /// Alpha-blends `color` onto the pixel at `(x, y)`.
    ///
    /// Fully opaque colors overwrite the pixel, fully transparent ones leave it untouched.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    pub fn blend(&mut self, x: u32, y: u32, color: Color) {
        match color.a() {
            0 => {}
            255 => self.set(x, y, color),
            _ => {
                let dest = self.get(x, y);
                self.set(x, y, color.over(dest));
            }
        }
    }

    /// Fills the whole image with `color`.
    pub fn clear(&mut self, color: Color) {
        for pixel in self.buf.pixels_mut() {
            *pixel = Rgba(color.0);
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        self.buf.as_raw()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
