//! I2C v1 register backend for STM32F4
//!
//! Drives I2C1..I2C3 through raw register accesses so the bus sequencing in
//! [`oledbus_hal::BusChannel`] stays in control of every wait.

use embassy_stm32::pac::i2c::{regs, I2c};
use oledbus_hal::{I2cConfig, I2cRegisters, I2cTiming, StatusFlag, TimingError};

/// F/S bit in CCR selecting fast mode
const CCR_FAST_MODE: u32 = 1 << 15;
/// DUTY bit in CCR selecting the 2:1 low/high ratio
const CCR_DUTY: u32 = 1 << 14;

/// I2C v1 master register block
#[derive(Clone, Copy)]
pub struct I2cV1 {
    regs: I2c,
}

impl I2cV1 {
    /// Wrap a register block, e.g. `embassy_stm32::pac::I2C1`
    pub const fn new(regs: I2c) -> Self {
        Self { regs }
    }

    /// Reset the peripheral and program its clock control registers
    ///
    /// `pclk_hz` is the APB1 clock feeding the block. The peripheral is left
    /// enabled.
    pub fn configure(&self, pclk_hz: u32, config: I2cConfig) -> Result<I2cTiming, TimingError> {
        let timing = I2cTiming::compute(pclk_hz, config)?;

        // Software reset clears any stuck BUSY state
        self.regs.cr1().modify(|w| w.set_swrst(true));
        self.regs.cr1().modify(|w| w.set_swrst(false));

        self.regs
            .cr2()
            .modify(|w| w.0 = (w.0 & !0x3F) | u32::from(timing.freq));

        let mut ccr = u32::from(timing.ccr);
        if timing.fast_mode {
            ccr |= CCR_FAST_MODE | CCR_DUTY;
        }
        self.regs.ccr().write_value(regs::Ccr(ccr));
        self.regs
            .trise()
            .write_value(regs::Trise(u32::from(timing.trise)));

        self.regs.cr1().modify(|w| w.set_pe(true));

        #[cfg(feature = "defmt")]
        defmt::debug!("I2C configured: {}", timing);

        Ok(timing)
    }
}

impl I2cRegisters for I2cV1 {
    fn generate_start(&mut self) {
        self.regs.cr1().modify(|w| w.set_start(true));
    }

    fn generate_stop(&mut self) {
        self.regs.cr1().modify(|w| w.set_stop(true));
    }

    fn write_data(&mut self, byte: u8) {
        self.regs.dr().write(|w| w.set_dr(byte));
    }

    fn flag(&mut self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::StartBit => self.regs.sr1().read().sb(),
            StatusFlag::AddressSent => self.regs.sr1().read().addr(),
            StatusFlag::ByteTransferFinished => self.regs.sr1().read().btf(),
            StatusFlag::TxEmpty => self.regs.sr1().read().txe(),
            StatusFlag::Busy => self.regs.sr2().read().busy(),
        }
    }

    fn clear_address_flag(&mut self) {
        // Reading SR1 then SR2 clears ADDR
        let _ = self.regs.sr1().read().0 | self.regs.sr2().read().0;
    }
}
