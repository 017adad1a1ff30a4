//! I2C bus abstractions
//!
//! Provides the transaction-level trait the display controller writes
//! through, implemented both by the register-level [`BusChannel`] and by any
//! `embedded-hal` I2C master.

use embedded_hal::i2c::{I2c, Operation};

use crate::channel::{BusChannel, BusError};
use crate::registers::I2cRegisters;

/// Control byte selecting command mode (D/C# = 0)
pub const CONTROL_COMMAND: u8 = 0x00;

/// Control byte selecting data mode (D/C# = 1)
pub const CONTROL_DATA: u8 = 0x40;

/// I2C bus master
///
/// Write-only transaction interface for communicating with peripheral
/// devices.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 8-bit address byte (7-bit address shifted left, R/W clear)
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write `control` followed by `payload` in a single transaction
    ///
    /// This is how command and pixel data are framed for the panel: one
    /// control byte, then any number of bytes it applies to.
    fn write_prefixed(
        &mut self,
        address: u8,
        control: u8,
        payload: &[u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(address, data)
    }

    fn write_prefixed(
        &mut self,
        address: u8,
        control: u8,
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        (**self).write_prefixed(address, control, payload)
    }
}

impl<R: I2cRegisters> I2cBus for BusChannel<R> {
    type Error = BusError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), BusError> {
        self.transmit(address, None, data)
    }

    fn write_prefixed(
        &mut self,
        address: u8,
        control: u8,
        payload: &[u8],
    ) -> Result<(), BusError> {
        self.transmit(address, Some(control), payload)
    }
}

/// Adapter running [`I2cBus`] transactions on an `embedded-hal` I2C master
///
/// `embedded-hal` takes 7-bit addresses, so the 8-bit address byte is
/// shifted right before use.
pub struct EmbeddedHalBus<I> {
    i2c: I,
}

impl<I: I2c> EmbeddedHalBus<I> {
    /// Wrap an `embedded-hal` I2C master
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the wrapped bus
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> I2cBus for EmbeddedHalBus<I> {
    type Error = I::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I::Error> {
        self.i2c.write(address >> 1, data)
    }

    fn write_prefixed(
        &mut self,
        address: u8,
        control: u8,
        payload: &[u8],
    ) -> Result<(), I::Error> {
        // Adjacent write operations are merged into one transfer
        self.i2c.transaction(
            address >> 1,
            &mut [Operation::Write(&[control]), Operation::Write(payload)],
        )
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };

    /// Check if this is a fast-mode frequency
    pub const fn is_fast_mode(&self) -> bool {
        self.frequency > Self::STANDARD.frequency
    }
}

/// Error computing clock control values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Peripheral clock outside the 2-50 MHz range the block accepts
    PeripheralClock,
    /// Requested bus frequency is zero or above fast mode
    BusFrequency,
}

/// Clock control register values for an I2C v1 master
///
/// - `freq` goes into `CR2.FREQ` (peripheral clock in MHz)
/// - `ccr` goes into `CCR.CCR`
/// - `trise` goes into `TRISE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cTiming {
    pub freq: u8,
    pub ccr: u16,
    pub trise: u8,
    pub fast_mode: bool,
}

impl I2cTiming {
    /// Maximum SCL rise time in standard mode (ns)
    const STANDARD_RISE_NS: u32 = 1000;
    /// Maximum SCL rise time in fast mode (ns)
    const FAST_RISE_NS: u32 = 300;

    /// Derive register values from the APB clock and the bus configuration
    ///
    /// Standard mode uses a 1:1 duty cycle (`T_high = CCR * T_pclk`), fast
    /// mode uses 2:1 (`T_high = CCR * T_pclk`, `T_low = 2 * CCR * T_pclk`).
    pub fn compute(pclk_hz: u32, config: I2cConfig) -> Result<Self, TimingError> {
        let freq_mhz = pclk_hz / 1_000_000;
        if !(2..=50).contains(&freq_mhz) {
            return Err(TimingError::PeripheralClock);
        }
        if config.frequency == 0 || config.frequency > I2cConfig::FAST.frequency {
            return Err(TimingError::BusFrequency);
        }

        let fast_mode = config.is_fast_mode();
        let (ccr, rise_ns, min_ccr) = if fast_mode {
            (pclk_hz / (3 * config.frequency), Self::FAST_RISE_NS, 1)
        } else {
            (pclk_hz / (2 * config.frequency), Self::STANDARD_RISE_NS, 4)
        };

        Ok(Self {
            freq: freq_mhz as u8,
            ccr: ccr.clamp(min_ccr, 0x0FFF) as u16,
            trise: (freq_mhz * rise_ns / 1000 + 1) as u8,
            fast_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::mock::{Access, MockRegisters};
    use crate::registers::StatusFlag;
    use crate::BusPhase;
    use embedded_hal::i2c::{ErrorKind, ErrorType, SevenBitAddress};

    #[test]
    fn test_channel_write_prefixed() {
        let mut bus = BusChannel::new(MockRegisters::new(), 100);
        bus.write_prefixed(0x78, CONTROL_COMMAND, &[0xAF]).unwrap();
        let data: heapless::Vec<u8, 8> = bus.registers().data().collect();
        assert_eq!(data.as_slice(), &[0x78, CONTROL_COMMAND, 0xAF]);
    }

    #[test]
    fn test_channel_write_raw() {
        let mut bus = BusChannel::new(MockRegisters::new(), 100);
        bus.write(0x78, &[0x00, 0xAE]).unwrap();
        assert_eq!(bus.registers().log.first(), Some(&Access::Start));
        assert_eq!(bus.registers().log.last(), Some(&Access::Stop));
    }

    #[test]
    fn test_channel_write_error() {
        let mut bus = BusChannel::new(MockRegisters::stuck(StatusFlag::Busy), 100);
        assert_eq!(
            bus.write_prefixed(0x78, CONTROL_DATA, &[0xFF]),
            Err(BusError::Timeout(BusPhase::Busy))
        );
    }

    // Records the address and the concatenated bytes of each transaction
    struct HalMock {
        address: Option<u8>,
        bytes: heapless::Vec<u8, 16>,
        transactions: u32,
    }

    impl ErrorType for HalMock {
        type Error = ErrorKind;
    }

    impl I2c<SevenBitAddress> for HalMock {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            self.address = Some(address);
            self.transactions += 1;
            for op in operations {
                match op {
                    Operation::Write(data) => {
                        self.bytes
                            .extend_from_slice(data)
                            .map_err(|_| ErrorKind::Other)?;
                    }
                    Operation::Read(_) => return Err(ErrorKind::Other),
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_embedded_hal_adapter_shifts_address() {
        let mut bus = EmbeddedHalBus::new(HalMock {
            address: None,
            bytes: heapless::Vec::new(),
            transactions: 0,
        });
        bus.write_prefixed(0x78, CONTROL_DATA, &[1, 2, 3]).unwrap();
        let mock = bus.release();
        assert_eq!(mock.address, Some(0x3C));
        assert_eq!(mock.bytes.as_slice(), &[CONTROL_DATA, 1, 2, 3]);
        assert_eq!(mock.transactions, 1);
    }

    #[test]
    fn test_standard_mode_timing_at_45mhz() {
        let timing = I2cTiming::compute(45_000_000, I2cConfig::STANDARD).unwrap();
        assert_eq!(timing.freq, 45);
        assert_eq!(timing.ccr, 225);
        assert_eq!(timing.trise, 46);
        assert!(!timing.fast_mode);
    }

    #[test]
    fn test_fast_mode_timing() {
        let timing = I2cTiming::compute(42_000_000, I2cConfig::FAST).unwrap();
        assert_eq!(timing.freq, 42);
        assert_eq!(timing.ccr, 35);
        assert_eq!(timing.trise, 13);
        assert!(timing.fast_mode);
    }

    #[test]
    fn test_timing_rejects_bad_clocks() {
        assert_eq!(
            I2cTiming::compute(1_000_000, I2cConfig::STANDARD),
            Err(TimingError::PeripheralClock)
        );
        assert_eq!(
            I2cTiming::compute(45_000_000, I2cConfig { frequency: 0 }),
            Err(TimingError::BusFrequency)
        );
        assert_eq!(
            I2cTiming::compute(45_000_000, I2cConfig { frequency: 1_000_000 }),
            Err(TimingError::BusFrequency)
        );
    }

    #[test]
    fn test_config_modes() {
        assert_eq!(I2cConfig::default(), I2cConfig::STANDARD);
        assert!(!I2cConfig::STANDARD.is_fast_mode());
        assert!(I2cConfig::FAST.is_fast_mode());
    }
}
