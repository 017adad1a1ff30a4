//! SSD1306 display controller
//!
//! Owns the framebuffer and cursor and talks to the panel through any
//! [`I2cBus`]. Drawing only touches memory; [`DisplayController::flush`]
//! pushes the whole buffer out page by page.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics_core::pixelcolor::BinaryColor;
use embedded_hal::delay::DelayNs;
use oledbus_hal::{I2cBus, CONTROL_COMMAND, CONTROL_DATA};

use crate::animation::{AnimationCommand, AnimationQueue};
use crate::assets::Sprite;
use crate::command::{cmd, init_sequence, page_start};
use crate::config::{ConfigError, DisplayConfig};
use crate::cursor::Cursor;
use crate::error::{DisplayError, FlushStep};
use crate::framebuffer::FrameBuffer;

/// Time the panel needs after power-up before it accepts commands
const POWER_UP_DELAY_MS: u32 = 100;

/// Most recently drawn sprite, kept for animation redraws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastSprite<'a> {
    pub sprite: Sprite<'a>,
    pub color: BinaryColor,
}

/// SSD1306 controller over an I2C bus
///
/// `W` is the panel width and `PAGES` the number of 8-row pages; the
/// defaults describe a 128x64 panel.
pub struct DisplayController<'a, B, const W: usize = 128, const PAGES: usize = 8> {
    pub(crate) bus: B,
    pub(crate) config: DisplayConfig,
    pub(crate) frame: FrameBuffer<W, PAGES>,
    pub(crate) cursor: Cursor,
    pub(crate) last_sprite: Option<LastSprite<'a>>,
}

impl<'a, B, const W: usize, const PAGES: usize> DisplayController<'a, B, W, PAGES> {
    /// Create a controller with a cleared framebuffer
    ///
    /// Nothing is sent to the panel until [`init`](Self::init).
    pub fn new(bus: B, config: DisplayConfig) -> Result<Self, ConfigError> {
        config.validate(FrameBuffer::<W, PAGES>::WIDTH)?;
        Ok(Self {
            bus,
            config,
            frame: FrameBuffer::new(),
            cursor: Cursor::new(),
            last_sprite: None,
        })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn frame(&self) -> &FrameBuffer<W, PAGES> {
        &self.frame
    }

    /// Direct access for `embedded-graphics` drawing
    pub fn frame_mut(&mut self) -> &mut FrameBuffer<W, PAGES> {
        &mut self.frame
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Move the cursor, starting a new run at `(x, y)`
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Cursor::at(x, y);
    }

    pub fn last_sprite(&self) -> Option<&LastSprite<'a>> {
        self.last_sprite.as_ref()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Set every pixel in the framebuffer
    pub fn fill(&mut self, color: BinaryColor) {
        self.frame.fill(color);
    }

    /// Set one pixel in the framebuffer; off-panel coordinates are ignored
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: BinaryColor) {
        self.frame.draw_pixel(x, y, color);
    }
}

impl<'a, B: I2cBus, const W: usize, const PAGES: usize> DisplayController<'a, B, W, PAGES> {
    /// Bring the panel up, clear it and home the cursor
    ///
    /// Each init byte is its own transaction. A failure aborts before the
    /// framebuffer is touched.
    pub fn init(&mut self) -> Result<(), DisplayError<B::Error>> {
        let height = u8::try_from(FrameBuffer::<W, PAGES>::HEIGHT).unwrap_or(u8::MAX);
        let sequence = init_sequence(height, self.config.contrast);

        for (step, &command) in sequence.iter().enumerate() {
            self.bus
                .write_prefixed(self.config.address, CONTROL_COMMAND, &[command])
                .map_err(|error| {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Display init failed at step {} ({:#x})", step, command);
                    DisplayError::Init {
                        step,
                        command,
                        error,
                    }
                })?;
        }

        self.frame.fill(BinaryColor::Off);
        self.flush()?;
        self.cursor = Cursor::new();

        #[cfg(feature = "defmt")]
        defmt::debug!("Display initialized ({}x{})", W, PAGES * 8);

        Ok(())
    }

    /// Wait for the panel to power up, then [`init`](Self::init)
    pub fn init_after(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError<B::Error>> {
        delay.delay_ms(POWER_UP_DELAY_MS);
        self.init()
    }

    /// Write the framebuffer to the panel
    ///
    /// Stops at the first failing step; pages before it have been written.
    pub fn flush(&mut self) -> Result<(), DisplayError<B::Error>> {
        let address = self.config.address;

        for page in 0..PAGES as u8 {
            let commands = [
                (FlushStep::PageStart, page_start(page)),
                (FlushStep::LowColumn, cmd::SET_LOW_COLUMN),
                (FlushStep::HighColumn, cmd::SET_HIGH_COLUMN),
            ];
            for (step, command) in commands {
                self.bus
                    .write_prefixed(address, CONTROL_COMMAND, &[command])
                    .map_err(|error| flush_error(page, step, error))?;
            }

            self.bus
                .write_prefixed(address, CONTROL_DATA, self.frame.page(usize::from(page)))
                .map_err(|error| flush_error(page, FlushStep::Data, error))?;
        }

        Ok(())
    }

    /// Set panel contrast; also used by later re-initialization
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError<B::Error>> {
        self.commands(&[cmd::SET_CONTRAST, contrast])?;
        self.config.contrast = contrast;
        Ok(())
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError<B::Error>> {
        if inverted {
            self.commands(&[cmd::SET_INVERSE])
        } else {
            self.commands(&[cmd::SET_NORMAL])
        }
    }

    /// Turn display on/off
    pub fn set_display_on(&mut self, on: bool) -> Result<(), DisplayError<B::Error>> {
        if on {
            self.commands(&[cmd::DISPLAY_ON])
        } else {
            self.commands(&[cmd::DISPLAY_OFF])
        }
    }

    /// Shift the last sprite right by one step and flush
    pub fn move_right(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.shift(i32::from(self.config.step))
    }

    /// Shift the last sprite left by one step and flush
    pub fn move_left(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.shift(-i32::from(self.config.step))
    }

    pub fn apply(&mut self, command: AnimationCommand) -> Result<(), DisplayError<B::Error>> {
        match command {
            AnimationCommand::MoveLeft => self.move_left(),
            AnimationCommand::MoveRight => self.move_right(),
        }
    }

    /// Apply queued animation requests
    ///
    /// Takes at most `N` commands so a chattering button cannot starve the
    /// caller. Returns the number applied.
    pub fn run_pending<M: RawMutex, const N: usize>(
        &mut self,
        queue: &AnimationQueue<M, N>,
    ) -> Result<usize, DisplayError<B::Error>> {
        let mut applied = 0;
        while applied < N {
            let Some(command) = queue.next() else {
                break;
            };
            self.apply(command)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn shift(&mut self, delta: i32) -> Result<(), DisplayError<B::Error>> {
        let Some(last) = self.last_sprite else {
            return Ok(());
        };

        self.cursor.x = self.clamp_step(i32::from(self.cursor.x_init) + delta);
        self.frame.fill(BinaryColor::Off);
        let redraw = self.write_img(last.sprite, last.color);
        self.flush()?;
        redraw.map_err(DisplayError::from)
    }

    /// Clamp an animation x position into `[step, W - step]`
    fn clamp_step(&self, x: i32) -> u16 {
        let step = u16::from(self.config.step);
        let max = FrameBuffer::<W, PAGES>::WIDTH.saturating_sub(step).max(step);
        let x = x.clamp(i32::from(step), i32::from(max));
        u16::try_from(x).unwrap_or(max)
    }

    fn commands(&mut self, bytes: &[u8]) -> Result<(), DisplayError<B::Error>> {
        for &byte in bytes {
            self.bus
                .write_prefixed(self.config.address, CONTROL_COMMAND, &[byte])
                .map_err(DisplayError::Command)?;
        }
        Ok(())
    }
}

fn flush_error<E>(page: u8, step: FlushStep, error: E) -> DisplayError<E> {
    #[cfg(feature = "defmt")]
    defmt::warn!("Display flush failed on page {} ({})", page, step);
    DisplayError::Flush { page, step, error }
}
