use alloc::vec::Vec;

use crate::{DecodeError, Limits};

/// A 24-bit `0xRRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xFF_FFFF);
    pub const BLACK: Color = Color(0x00_0000);

    pub const fn new(rgb: u32) -> Self {
        Color(rgb & 0xFF_FFFF)
    }

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Color((red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    /// Color table entries of a BMP are stored blue, green, red, unused.
    pub const fn from_bgr0(entry: [u8; 4]) -> Self {
        Self::from_rgb(entry[2], entry[1], entry[0])
    }

    pub const fn rgb(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

#[cfg(feature = "graphics")]
impl From<Color> for embedded_graphics::pixelcolor::Rgb888 {
    fn from(color: Color) -> Self {
        embedded_graphics::pixelcolor::Rgb888::new(color.red(), color.green(), color.blue())
    }
}

/// Ordered color table, the position of an entry is its pixel index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Self {
        Palette { colors }
    }

    pub fn duotone(white: Color, black: Color) -> Self {
        Palette {
            colors: alloc::vec![white, black],
        }
    }

    pub fn single(color: Color) -> Self {
        Palette {
            colors: alloc::vec![color],
        }
    }

    /// Builds a palette from a BMP color table, 4 bytes per entry.
    pub fn from_bgr0_table(table: &[u8]) -> Self {
        let mut colors = Vec::with_capacity(table.len() / 4);
        for entry in table.chunks_exact(4) {
            colors.push(Color::from_bgr0([entry[0], entry[1], entry[2], entry[3]]));
        }
        Palette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<Color> {
        self.colors.get(index as usize).copied()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// Row-major indexed image.
///
/// Every pixel is an index into [`Bitmap::palette`], stored one per byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    palette: Palette,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Allocates a bitmap filled with index 0.
    pub fn new(width: usize, height: usize, palette: Palette) -> Result<Self, DecodeError> {
        let len = width
            .checked_mul(height)
            .ok_or(DecodeError::ImageTooLarge { width, height })?;
        if palette.is_empty() || palette.len() > u8::MAX as usize + 1 {
            return Err(DecodeError::InvalidHeader);
        }
        Ok(Bitmap {
            width,
            height,
            palette,
            pixels: alloc::vec![0; len],
        })
    }

    /// Same as [`Bitmap::new`] but refuses sizes above `limits`.
    pub fn with_limits(
        width: usize,
        height: usize,
        palette: Palette,
        limits: &Limits,
    ) -> Result<Self, DecodeError> {
        match width.checked_mul(height) {
            Some(len) if len <= limits.max_pixels => {}
            _ => return Err(DecodeError::ImageTooLarge { width, height }),
        }
        Self::new(width, height, palette)
    }

    /// 1×1 bitmap showing `color`, used for bodies that can't be decoded.
    pub fn placeholder(color: Color) -> Self {
        Bitmap {
            width: 1,
            height: 1,
            palette: Palette::single(color),
            pixels: alloc::vec![0],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn color_count(&self) -> usize {
        self.palette.len()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.pixel(x, y).and_then(|index| self.palette.get(index))
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.pixels[start..start + self.width])
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    /// Write cursor starting at the top-left pixel.
    pub fn cursor(&mut self) -> PixelCursor<'_> {
        PixelCursor {
            color_count: self.palette.len(),
            pixels: &mut self.pixels,
            position: 0,
        }
    }

    pub fn into_parts(self) -> (usize, usize, Palette, Vec<u8>) {
        (self.width, self.height, self.palette, self.pixels)
    }
}

/// Raster-order writer over the pixels of a [`Bitmap`].
///
/// Writes past the last pixel are dropped.
pub struct PixelCursor<'a> {
    pixels: &'a mut [u8],
    position: usize,
    color_count: usize,
}

impl PixelCursor<'_> {
    /// Writes `value` into the next `count` pixels and returns how many were
    /// written before reaching the end of the buffer.
    pub fn fill(&mut self, value: u8, count: usize) -> Result<usize, DecodeError> {
        let count = core::cmp::min(count, self.remaining());
        if count == 0 {
            return Ok(0);
        }
        if value as usize >= self.color_count {
            return Err(DecodeError::PixelOutOfRange {
                value,
                color_count: self.color_count,
            });
        }
        self.pixels[self.position..self.position + count].fill(value);
        self.position += count;
        Ok(count)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.pixels.len() - self.position
    }

    pub fn is_full(&self) -> bool {
        self.position == self.pixels.len()
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    use embedded_graphics::{
        Pixel,
        image::ImageDrawable,
        pixelcolor::Rgb888,
        prelude::{DrawTarget, OriginDimensions, Point, Size},
        primitives::{PointsIter, Rectangle},
    };

    use super::Bitmap;

    impl Bitmap {
        fn rgb888(&self, index: u8) -> Rgb888 {
            self.palette.get(index).unwrap_or_default().into()
        }
    }

    impl OriginDimensions for Bitmap {
        fn size(&self) -> Size {
            Size::new(self.width as u32, self.height as u32)
        }
    }

    impl ImageDrawable for Bitmap {
        type Color = Rgb888;

        fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
        where
            D: DrawTarget<Color = Self::Color>,
        {
            let area = Rectangle::new(Point::zero(), self.size());
            target.fill_contiguous(&area, self.pixels.iter().map(|&index| self.rgb888(index)))
        }

        fn draw_sub_image<D>(&self, target: &mut D, area: &Rectangle) -> Result<(), D::Error>
        where
            D: DrawTarget<Color = Self::Color>,
        {
            let area = area.intersection(&Rectangle::new(Point::zero(), self.size()));
            target.draw_iter(area.points().map(|point| {
                let index = self.pixels[point.y as usize * self.width + point.x as usize];
                Pixel(point - area.top_left, self.rgb888(index))
            }))
        }
    }
}
