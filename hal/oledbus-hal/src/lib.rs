//! oledbus Hardware Abstraction Layer
//!
//! This crate implements the two-wire bus transaction primitives used to talk
//! to the OLED panel. Every wait on a peripheral status flag is bounded by an
//! iteration count, so a stuck bus surfaces as a [`BusError`] instead of a
//! hang.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  oledbus-display (DisplayController)    │
//! └─────────────────────────────────────────┘
//!                     │  I2cBus
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  BusChannel (this crate)                │
//! └─────────────────────────────────────────┘
//!                     │  I2cRegisters
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ oledbus-hal-  │       │  test mocks   │
//! │    stm32f4    │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registers`] - status flags and the peripheral register seam
//! - [`poll`] - bounded polling loop
//! - [`channel`] - start/stop/address/byte/burst primitives
//! - [`i2c`] - transaction-level [`I2cBus`] trait and adapters

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod i2c;
pub mod poll;
pub mod registers;

// Re-export key types at crate root for convenience
pub use channel::{BusChannel, BusError, BusPhase};
pub use i2c::{
    EmbeddedHalBus, I2cBus, I2cConfig, I2cTiming, TimingError, CONTROL_COMMAND, CONTROL_DATA,
};
pub use poll::{poll_until, PollOutcome};
pub use registers::{I2cRegisters, StatusFlag};
