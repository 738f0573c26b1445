//! Drawing primitives.
//!
//! Every function in here returns a guard object that allows customizing the primitive and draws
//! it when dropped.

use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::Dimensions,
    mono_font::{ascii, MonoFont, MonoTextStyle},
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::{Color, Image, Rect};

/// Monospace font sizes available for [`text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    /// 6x10 pixel glyphs.
    Small,
    /// 8x13 pixel glyphs.
    #[default]
    Medium,
    /// 10x20 pixel glyphs.
    Large,
}

impl FontSize {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &ascii::FONT_6X10,
            FontSize::Medium => &ascii::FONT_8X13,
            FontSize::Large => &ascii::FONT_10X20,
        }
    }

    /// Returns the height of a line of text, in pixels.
    pub fn line_height(self) -> u32 {
        self.font().character_size.height
    }
}

/// A rectangle that is drawn when this guard goes out of scope.
pub struct DrawRect<'a> {
    image: &'a mut Image,
    rect: Rect,
    color: Color,
    filled: bool,
}

impl DrawRect<'_> {
    /// Translucent colors are blended with the pixels below.
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Fills the rectangle instead of drawing its outline.
    pub fn filled(&mut self) -> &mut Self {
        self.filled = true;
        self
    }
}

impl Drop for DrawRect<'_> {
    fn drop(&mut self) {
        let style = if self.filled {
            PrimitiveStyle::with_fill(self.color)
        } else {
            PrimitiveStyle::with_stroke(self.color, 1)
        };
        match self
            .rect
            .to_rectangle()
            .into_styled(style)
            .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// A diagonal cross that is drawn when this guard goes out of scope.
pub struct DrawMarker<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    color: Color,
    size: u32,
}

impl DrawMarker<'_> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Sets the side length of the cross, in pixels (5 by default).
    ///
    /// # Panics
    ///
    /// Panics if `size` is even, since the cross has to be centered on a pixel.
    pub fn size(&mut self, size: u32) -> &mut Self {
        assert!(size % 2 == 1, "marker size must be odd, got {size}");
        self.size = size;
        self
    }
}

impl Drop for DrawMarker<'_> {
    fn drop(&mut self) {
        let r = (self.size / 2) as i32;
        let (x, y, color) = (self.x, self.y, self.color);
        let pixels = (-r..=r).flat_map(move |d| {
            let diagonal = Pixel(Point::new(x + d, y + d), color);
            let anti = Pixel(Point::new(x - d, y + d), color);
            // The center is shared by both strokes.
            [Some(diagonal), (d != 0).then_some(anti)].into_iter().flatten()
        });
        match Target(&mut *self.image).draw_iter(pixels) {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// A line segment that is drawn when this guard goes out of scope.
pub struct DrawLine<'a> {
    image: &'a mut Image,
    start: Point,
    end: Point,
    color: Color,
    stroke_width: u32,
}

impl DrawLine<'_> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    /// Line thickness in pixels, 1 by default.
    pub fn stroke_width(&mut self, width: u32) -> &mut Self {
        self.stroke_width = width;
        self
    }
}

impl Drop for DrawLine<'_> {
    fn drop(&mut self) {
        match Line::new(self.start, self.end)
            .into_styled(PrimitiveStyle::with_stroke(self.color, self.stroke_width))
            .draw(&mut Target(&mut *self.image))
        {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// A line of text that is drawn when this guard goes out of scope.
pub struct DrawText<'a> {
    image: &'a mut Image,
    x: i32,
    y: i32,
    text: &'a str,
    color: Color,
    font: FontSize,
    alignment: Alignment,
    baseline: Baseline,
    background: Option<Color>,
    padding: u32,
}

impl<'a> DrawText<'a> {
    pub fn color(&mut self, color: Color) -> &mut Self {
        self.color = color;
        self
    }

    pub fn font(&mut self, font: FontSize) -> &mut Self {
        self.font = font;
        self
    }

    /// Draws a plate of `color` behind the text, extending `padding` pixels past the glyphs.
    pub fn background(&mut self, color: Color, padding: u32) -> &mut Self {
        self.background = Some(color);
        self.padding = padding;
        self
    }

    /// Places the top edge of the text at `y` instead of centering it.
    pub fn align_top(&mut self) -> &mut Self {
        self.baseline = Baseline::Top;
        self
    }

    /// Starts the text at `x` instead of centering it.
    pub fn align_left(&mut self) -> &mut Self {
        self.alignment = Alignment::Left;
        self
    }

    fn build(&self) -> Text<'a, MonoTextStyle<'static, Color>> {
        let character_style = MonoTextStyle::new(self.font.font(), self.color);
        let layout = TextStyleBuilder::new()
            .alignment(self.alignment)
            .baseline(self.baseline)
            .build();
        Text::with_text_style(
            self.text,
            Point::new(self.x, self.y),
            character_style,
            layout,
        )
    }
}

impl Drop for DrawText<'_> {
    fn drop(&mut self) {
        // FIXME: e-g's fonts lack some common glyphs, non-ASCII text renders as `?`
        let text = self.build();
        if let Some(background) = self.background {
            let plate = Rect::from_rectangle(text.bounding_box()).grow(self.padding);
            rect(&mut *self.image, plate).color(background).filled();
        }
        match text.draw(&mut Target(&mut *self.image)) {
            Ok(_) => {}
            Err(infallible) => match infallible {},
        }
    }
}

/// Outlines `rect` in red, or fills it when [`DrawRect::filled`] is called.
pub fn rect(image: &mut Image, rect: Rect) -> DrawRect<'_> {
    DrawRect {
        image,
        rect,
        color: Color::RED,
        filled: false,
    }
}

/// Marks the point `(x, y)` with a small cross.
pub fn marker(image: &mut Image, x: i32, y: i32) -> DrawMarker<'_> {
    DrawMarker {
        image,
        x,
        y,
        color: Color::RED,
        size: 5,
    }
}

/// Connects two points with a 1-pixel blue line.
pub fn line(image: &mut Image, start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> DrawLine<'_> {
    DrawLine {
        image,
        start: Point::new(start_x, start_y),
        end: Point::new(end_x, end_y),
        color: Color::BLUE,
        stroke_width: 1,
    }
}

/// Writes `text` centered on `(x, y)`.
pub fn text<'a>(image: &'a mut Image, x: i32, y: i32, text: &'a str) -> DrawText<'a> {
    DrawText {
        image,
        x,
        y,
        text,
        color: Color::RED,
        font: FontSize::default(),
        alignment: Alignment::Center,
        baseline: Baseline::Middle,
        background: None,
        padding: 0,
    }
}

struct Target<'a>(&'a mut Image);

impl Dimensions for Target<'_> {
    fn bounding_box(&self) -> Rectangle {
        self.0.rect().to_rectangle()
    }
}

impl DrawTarget for Target<'_> {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.0.rect();
        for Pixel(point, color) in pixels {
            if bounds.contains(point.x, point.y) {
                self.0.blend(point.x as u32, point.y as u32, color);
            }
        }

        Ok(())
    }
}
