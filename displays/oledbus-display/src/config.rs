//! Controller configuration
//!
//! Defaults match the panel this driver was brought up on. With the `serde`
//! feature the configuration can be stored as a postcard blob, e.g. in a
//! flash sector, and loaded back with [`DisplayConfig::from_bytes`].

use oledbus_hal::{BusChannel, I2cRegisters};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default panel address byte (0x3C shifted left, write bit clear)
pub const DEFAULT_ADDRESS: u8 = 0x78;

/// Default polling bound for bus waits
pub const DEFAULT_TIMEOUT: u32 = 100_000;

/// Default horizontal animation step in pixels
pub const DEFAULT_STEP: u8 = 5;

/// How the y position of a wrapped text line is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineAdvance {
    /// `(y_init + height) * line`
    ///
    /// Only lands on line boundaries when the run starts at `y = 0`; kept as
    /// the default because existing layouts were built against it.
    #[default]
    Multiplicative,
    /// `y_init + height * line`
    Additive,
}

impl LineAdvance {
    /// Y position of line `line` (1-based count of completed lines)
    pub fn line_y(self, y_init: u16, height: u16, line: u16) -> u32 {
        let (y_init, height, line) = (u32::from(y_init), u32::from(height), u32::from(line));
        match self {
            LineAdvance::Multiplicative => (y_init + height) * line,
            LineAdvance::Additive => y_init + height * line,
        }
    }
}

/// Display controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Panel address byte, pre-shifted with the write bit clear
    pub address: u8,
    /// Polling bound for every bus wait
    pub timeout: u32,
    /// Pixels moved per animation step
    pub step: u8,
    /// Contrast sent during initialization
    pub contrast: u8,
    /// Wrapped text line placement
    pub line_advance: LineAdvance,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            timeout: DEFAULT_TIMEOUT,
            step: DEFAULT_STEP,
            contrast: 0xFF,
            line_advance: LineAdvance::Multiplicative,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A zero polling bound would fail every wait that is not already ready
    ZeroTimeout,
    /// Step must be non-zero and leave room for the clamp range
    InvalidStep,
    /// Address byte has the read bit set
    InvalidAddress,
    /// Stored blob could not be decoded
    Decode,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

impl DisplayConfig {
    /// Check the configuration against a panel `width`
    pub fn validate(&self, width: u16) -> Result<(), ConfigError> {
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.step == 0 || u16::from(self.step) * 2 > width {
            return Err(ConfigError::InvalidStep);
        }
        if self.address & 0x01 != 0 {
            return Err(ConfigError::InvalidAddress);
        }
        Ok(())
    }

    /// Build a bus channel over `regs` using the configured polling bound
    pub fn bus_channel<R: I2cRegisters>(&self, regs: R) -> BusChannel<R> {
        BusChannel::new(regs, self.timeout)
    }

    /// Decode and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8], width: u16) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate(width)?;
        Ok(config)
    }

    /// Encode into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::BufferTooSmall)
    }
}
