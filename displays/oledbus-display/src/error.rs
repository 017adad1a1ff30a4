//! Display errors
//!
//! Bus failures carry the step that failed so a partial init or flush can
//! be diagnosed. Rendering failures never touch the bus.

/// Step of a page write during a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushStep {
    /// Page start address command
    PageStart,
    /// Lower column start nibble command
    LowColumn,
    /// Upper column start nibble command
    HighColumn,
    /// Burst write of the page data
    Data,
}

/// Reasons a text or sprite draw was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Not enough room on the current line or screen
    InsufficientSpace,
    /// The font has no glyph for the character
    MissingGlyph,
    /// Sprite table is shorter than `height * sections` rows
    MalformedSprite,
}

/// A string stopped rendering at `ch`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextError {
    /// First character that could not be written
    pub ch: char,
    /// Why it was refused
    pub error: RenderError,
}

/// Display controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// A bring-up command failed; the panel state is unknown
    Init {
        /// Index into the init sequence
        step: usize,
        /// Byte that was being sent
        command: u8,
        /// Bus error
        error: E,
    },
    /// Writing the framebuffer to the panel failed
    Flush {
        /// Page being written
        page: u8,
        /// Step within that page
        step: FlushStep,
        /// Bus error
        error: E,
    },
    /// A runtime command failed
    Command(E),
    /// Redrawing after an animation step was refused
    Render(RenderError),
}

impl<E> DisplayError<E> {
    /// Underlying bus error, if any
    pub fn bus_error(&self) -> Option<&E> {
        match self {
            DisplayError::Init { error, .. }
            | DisplayError::Flush { error, .. }
            | DisplayError::Command(error) => Some(error),
            DisplayError::Render(_) => None,
        }
    }
}

impl<E> From<RenderError> for DisplayError<E> {
    fn from(e: RenderError) -> Self {
        DisplayError::Render(e)
    }
}
