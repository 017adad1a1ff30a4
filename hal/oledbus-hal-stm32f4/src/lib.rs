//! STM32F4-specific HAL for oledbus
//!
//! This crate provides the register-level [`oledbus_hal::I2cRegisters`]
//! implementation for the I2C v1 peripheral found on STM32F4 parts. It uses
//! the peripheral access crate re-exported by `embassy-stm32` and nothing
//! from its driver layer.
//!
//! # Features
//!
//! - `stm32f446re`, `stm32f411ce`, `stm32f401re` - chip selection
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! Clock gating and pin muxing are left to the application. Once the
//! peripheral clock is running and SCL/SDA are in alternate-function
//! open-drain mode, configure the block and hand it to a
//! [`oledbus_hal::BusChannel`]:
//!
//! ```ignore
//! let regs = I2cV1::new(embassy_stm32::pac::I2C1);
//! regs.configure(45_000_000, I2cConfig::STANDARD)?;
//! let bus = BusChannel::new(regs, 100_000);
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

// Re-export shared types from oledbus-hal
pub use i2c::I2cV1;
pub use oledbus_hal::{BusChannel, I2cConfig, I2cTiming, TimingError};
