//! Font and sprite tables
//!
//! Both asset kinds are borrowed tables of 16-bit rows. Bit 15 of a row is
//! the leftmost pixel, so a row can describe at most 16 columns; columns
//! past that render as background.

/// First character code present in a font table
pub const FIRST_CHAR: u32 = 32;

/// Fixed-size bitmap font
///
/// Glyph rows are stored back to back, `height` rows per character,
/// starting at ASCII space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font<'a> {
    /// Glyph width in pixels
    pub width: u8,
    /// Glyph height in pixels
    pub height: u8,
    /// Row bitmaps, indexed by `(code - 32) * height + row`
    pub data: &'a [u16],
}

impl<'a> Font<'a> {
    /// Create a font over a row table
    pub const fn new(width: u8, height: u8, data: &'a [u16]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Rows for `ch`, or `None` if the table has no glyph for it
    pub fn glyph(&self, ch: char) -> Option<&'a [u16]> {
        let code = u32::from(ch).checked_sub(FIRST_CHAR)? as usize;
        let height = usize::from(self.height);
        let start = code.checked_mul(height)?;
        self.data.get(start..start + height)
    }
}

/// Multi-section bitmap image
///
/// A sprite is `sections` sub-images of `width` x `height` laid side by
/// side. Section `n` occupies rows `n * height .. (n + 1) * height` of the
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite<'a> {
    /// Section width in pixels
    pub width: u8,
    /// Height in pixels
    pub height: u8,
    /// Number of horizontally tiled sections
    pub sections: u8,
    /// Row bitmaps for all sections
    pub data: &'a [u16],
}

impl<'a> Sprite<'a> {
    /// Create a sprite over a row table
    pub const fn new(width: u8, height: u8, sections: u8, data: &'a [u16]) -> Self {
        Self {
            width,
            height,
            sections,
            data,
        }
    }

    /// Rows of one section, or `None` past the end of the table
    pub fn section(&self, index: u8) -> Option<&'a [u16]> {
        let height = usize::from(self.height);
        let start = usize::from(index) * height;
        self.data.get(start..start + height)
    }

    /// Total width of all sections
    pub const fn total_width(&self) -> u16 {
        self.width as u16 * self.sections as u16
    }

    /// Check the table holds every row of every section
    pub fn is_complete(&self) -> bool {
        self.data.len() >= usize::from(self.height) * usize::from(self.sections)
    }
}

/// Test whether `column` of a row bitmap is set
#[inline]
pub(crate) fn row_bit(row: u16, column: u16) -> bool {
    column < 16 && (row << column) & 0x8000 != 0
}
