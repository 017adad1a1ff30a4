//! Draw cursor

use crate::config::LineAdvance;

/// Current draw position and the origin of the current text/image run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Current x position
    pub x: u16,
    /// Current y position
    pub y: u16,
    /// X position where the current run started
    pub x_init: u16,
    /// Y position where the current run started
    pub y_init: u16,
    /// Line of the current run, starting at 1; bumped on every wrap
    pub wrap_counter: u16,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// Cursor at the top-left corner
    pub const fn new() -> Self {
        Self::at(0, 0)
    }

    /// Cursor at `(x, y)` with the run origin at the same point
    pub const fn at(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            x_init: x,
            y_init: y,
            wrap_counter: 1,
        }
    }

    /// Record the current position as the origin of a new run
    pub fn mark_origin(&mut self) {
        self.x_init = self.x;
        self.y_init = self.y;
    }

    /// Start a new text run at the current position
    pub fn begin_run(&mut self) {
        self.mark_origin();
        self.wrap_counter = 1;
    }

    /// Position after wrapping onto the next line of the run
    ///
    /// Returns the wrapped cursor and the new y as a wide value so callers
    /// can bounds-check it before committing.
    pub fn wrapped(&self, line_height: u16, advance: LineAdvance) -> (Self, u32) {
        let y = advance.line_y(self.y_init, line_height, self.wrap_counter);
        let next = Self {
            x: self.x_init,
            y: u16::try_from(y).unwrap_or(u16::MAX),
            wrap_counter: self.wrap_counter.saturating_add(1),
            ..*self
        };
        (next, y)
    }
}
