//! SSD1306 OLED display controller for oledbus
//!
//! This crate provides:
//! - [`DisplayController`] driving a page-addressed monochrome panel over any
//!   [`oledbus_hal::I2cBus`]
//! - [`FrameBuffer`] with `embedded-graphics` [`DrawTarget`] support
//! - Bitmap [`Font`] and [`Sprite`] rendering with cursor wrap
//! - [`AnimationQueue`] for moving the last sprite from interrupt handlers
//!
//! # Architecture
//!
//! All drawing happens in the framebuffer. Nothing reaches the panel until
//! [`DisplayController::flush`], which sends the buffer one 8-row page at a
//! time. Animation requests from button interrupts are queued and applied
//! by the main flow, so the framebuffer has a single writer.
//!
//! ```ignore
//! let bus = config.bus_channel(I2cV1::new(pac::I2C1));
//! let mut display: DisplayController<_> = DisplayController::new(bus, config)?;
//! display.init_after(&mut delay)?;
//!
//! display.write_str("HELLO", &FONT_7X10, BinaryColor::On, true)?;
//! display.flush()?;
//! ```
//!
//! [`DrawTarget`]: embedded_graphics_core::draw_target::DrawTarget

#![no_std]
#![deny(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod command;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod framebuffer;
mod render;

#[cfg(test)]
mod mock;

// Re-export key types
pub use animation::{AnimationCommand, AnimationQueue, InterruptQueue, ANIMATION_QUEUE_SIZE};
pub use assets::{Font, Sprite};
pub use config::{ConfigError, DisplayConfig, LineAdvance};
pub use controller::{DisplayController, LastSprite};
pub use cursor::Cursor;
pub use error::{DisplayError, FlushStep, RenderError, TextError};
pub use framebuffer::FrameBuffer;
