//! Page-organized monochrome framebuffer
//!
//! The panel's RAM is split into 8-pixel-tall pages. Each byte holds one
//! column of a page with bit 0 at the top, so pixel (x, y) lives in byte
//! `x + (y / 8) * W`, bit `y % 8`.

use core::convert::Infallible;

use embedded_graphics_core::draw_target::DrawTarget;
use embedded_graphics_core::geometry::{OriginDimensions, Size};
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_graphics_core::Pixel;

use crate::assets::row_bit;

/// Off-screen copy of the panel's display RAM
///
/// `W` is the width in pixels and `PAGES` the number of 8-row pages, so the
/// height is `PAGES * 8` and the buffer is `(W * H) / 8` bytes. The
/// controller addresses at most 128 columns and 8 pages; other geometries
/// fail to compile.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer<const W: usize = 128, const PAGES: usize = 8> {
    pages: [[u8; W]; PAGES],
}

impl<const W: usize, const PAGES: usize> Default for FrameBuffer<W, PAGES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const PAGES: usize> FrameBuffer<W, PAGES> {
    /// Panel width in pixels
    pub const WIDTH: u16 = W as u16;
    /// Panel height in pixels
    pub const HEIGHT: u16 = (PAGES * 8) as u16;
    /// Buffer size in bytes
    pub const SIZE: usize = W * PAGES;

    const GEOMETRY: () = assert!(
        W >= 1 && W <= 128 && PAGES >= 1 && PAGES <= 8,
        "panel must be 1..=128 columns and 1..=8 pages"
    );

    /// Create a cleared framebuffer
    pub const fn new() -> Self {
        let () = Self::GEOMETRY;
        Self {
            pages: [[0; W]; PAGES],
        }
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: BinaryColor) {
        let value = match color {
            BinaryColor::Off => 0x00,
            BinaryColor::On => 0xFF,
        };
        for page in self.pages.iter_mut() {
            page.fill(value);
        }
    }

    /// Set a single pixel
    ///
    /// Coordinates outside the panel are ignored.
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: BinaryColor) {
        if x >= Self::WIDTH || y >= Self::HEIGHT {
            return;
        }

        let byte = &mut self.pages[usize::from(y / 8)][usize::from(x)];
        let mask = 1u8 << (y % 8);
        match color {
            BinaryColor::On => *byte |= mask,
            BinaryColor::Off => *byte &= !mask,
        }
    }

    /// Read back a pixel, or `None` outside the panel
    pub fn pixel(&self, x: u16, y: u16) -> Option<BinaryColor> {
        if x >= Self::WIDTH || y >= Self::HEIGHT {
            return None;
        }

        let byte = self.pages[usize::from(y / 8)][usize::from(x)];
        if byte & (1 << (y % 8)) != 0 {
            Some(BinaryColor::On)
        } else {
            Some(BinaryColor::Off)
        }
    }

    /// Copy a block of MSB-first rows into the buffer
    ///
    /// Set bits are drawn in `color`, clear bits in its complement, so the
    /// whole `width` x `rows.len()` cell is overwritten. Pixels falling off
    /// the panel are dropped.
    pub fn blit(&mut self, x: u16, y: u16, width: u16, rows: &[u16], color: BinaryColor) {
        for (i, &row) in rows.iter().enumerate() {
            let Ok(i) = u16::try_from(i) else {
                break;
            };
            for j in 0..width {
                let c = if row_bit(row, j) { color } else { color.invert() };
                self.draw_pixel(x.saturating_add(j), y.saturating_add(i), c);
            }
        }
    }

    /// One page (8 rows) of column bytes, as sent to the panel
    pub fn page(&self, page: usize) -> &[u8; W] {
        &self.pages[page]
    }

    /// Whole buffer in panel order
    pub fn as_bytes(&self) -> &[u8] {
        self.pages.as_flattened()
    }
}

impl<const W: usize, const PAGES: usize> core::fmt::Debug for FrameBuffer<W, PAGES> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &W)
            .field("height", &(PAGES * 8))
            .finish_non_exhaustive()
    }
}

impl<const W: usize, const PAGES: usize> OriginDimensions for FrameBuffer<W, PAGES> {
    fn size(&self) -> Size {
        Size::new(W as u32, (PAGES * 8) as u32)
    }
}

impl<const W: usize, const PAGES: usize> DrawTarget for FrameBuffer<W, PAGES> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                self.draw_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}
