//! Bus transaction primitives
//!
//! [`BusChannel`] sequences a master-transmitter transfer by hand: raise a
//! start condition, send the address, load data bytes one at a time, raise a
//! stop condition. Every step that waits on the peripheral is bounded by an
//! iteration count.

use crate::poll::{poll_until, PollOutcome};
use crate::registers::{I2cRegisters, StatusFlag};

/// Step of a transaction that was waiting when a bound expired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusPhase {
    /// Waiting for the start condition to be acknowledged
    Start,
    /// Waiting for the bus to report busy after start
    Busy,
    /// Waiting for the address phase to complete
    Address,
    /// Waiting for the data register to empty
    TxEmpty,
    /// Waiting for the final byte to leave the shift register
    ByteTransfer,
}

/// Error from bus operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// A status flag did not assert within the iteration bound
    Timeout(BusPhase),
}

impl BusError {
    /// Phase that timed out
    pub const fn phase(&self) -> BusPhase {
        match self {
            BusError::Timeout(phase) => *phase,
        }
    }
}

/// Polled I2C master channel
///
/// Owns the peripheral registers and a default polling bound used by the
/// transaction-level [`crate::I2cBus`] implementation. The individual
/// primitives take their bound explicitly.
pub struct BusChannel<R> {
    regs: R,
    timeout: u32,
}

impl<R: I2cRegisters> BusChannel<R> {
    /// Create a channel over `regs` with the given default polling bound
    pub const fn new(regs: R, timeout: u32) -> Self {
        Self { regs, timeout }
    }

    /// Default polling bound for transactions
    pub const fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Change the default polling bound
    pub fn set_timeout(&mut self, timeout: u32) {
        self.timeout = timeout;
    }

    /// Get access to the underlying registers
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Get mutable access to the underlying registers
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Release the underlying registers
    pub fn release(self) -> R {
        self.regs
    }

    /// Generate a start condition and wait for it to be acknowledged
    pub fn start(&mut self, timeout: u32) -> Result<(), BusError> {
        self.regs.generate_start();
        self.wait(StatusFlag::StartBit, timeout, BusPhase::Start)
    }

    /// Generate a stop condition
    ///
    /// There is nothing to wait for; the peripheral releases the bus after
    /// the current byte.
    pub fn stop(&mut self) {
        self.regs.generate_stop();
    }

    /// Send the (pre-shifted) target address
    ///
    /// On success the address flag is cleared before returning.
    pub fn send_address(&mut self, address: u8, timeout: u32) -> Result<(), BusError> {
        self.regs.write_data(address);
        self.wait(StatusFlag::AddressSent, timeout, BusPhase::Address)?;
        self.regs.clear_address_flag();
        Ok(())
    }

    /// Send a single byte and wait for it to leave the shift register
    pub fn send_byte(&mut self, data: u8, timeout: u32) -> Result<(), BusError> {
        self.load(data, timeout)?;
        self.wait(
            StatusFlag::ByteTransferFinished,
            timeout,
            BusPhase::ByteTransfer,
        )
    }

    /// Send a run of bytes back to back
    ///
    /// The data register must be empty before each byte; the transfer-finished
    /// flag is only checked after the last one. An empty slice is a no-op.
    pub fn send_burst(&mut self, data: &[u8], timeout: u32) -> Result<(), BusError> {
        if data.is_empty() {
            return Ok(());
        }

        for &byte in data {
            self.load(byte, timeout)?;
        }

        self.wait(
            StatusFlag::ByteTransferFinished,
            timeout,
            BusPhase::ByteTransfer,
        )
    }

    /// Check whether a device acknowledges `address`
    pub fn probe(&mut self, address: u8) -> Result<(), BusError> {
        let timeout = self.timeout;
        let result = self.open(address, timeout);
        self.stop();
        result
    }

    /// Run a complete write transaction
    ///
    /// `start → address → [control] → payload → stop`. The stop condition is
    /// raised even when an earlier step fails so the bus is not left held.
    pub fn transmit(
        &mut self,
        address: u8,
        control: Option<u8>,
        payload: &[u8],
    ) -> Result<(), BusError> {
        let timeout = self.timeout;
        let result = self.transmit_inner(address, control, payload, timeout);
        self.stop();
        result
    }

    fn transmit_inner(
        &mut self,
        address: u8,
        control: Option<u8>,
        payload: &[u8],
        timeout: u32,
    ) -> Result<(), BusError> {
        self.open(address, timeout)?;

        if let Some(control) = control {
            if payload.is_empty() {
                return self.send_byte(control, timeout);
            }
            self.load(control, timeout)?;
        }

        self.send_burst(payload, timeout)
    }

    /// Start, wait for the bus to go busy, and address the target
    fn open(&mut self, address: u8, timeout: u32) -> Result<(), BusError> {
        self.start(timeout)?;
        self.wait(StatusFlag::Busy, timeout, BusPhase::Busy)?;
        self.send_address(address, timeout)
    }

    /// Wait for the data register to empty, then load `byte`
    fn load(&mut self, byte: u8, timeout: u32) -> Result<(), BusError> {
        self.wait(StatusFlag::TxEmpty, timeout, BusPhase::TxEmpty)?;
        self.regs.write_data(byte);
        Ok(())
    }

    fn wait(&mut self, flag: StatusFlag, timeout: u32, phase: BusPhase) -> Result<(), BusError> {
        let regs = &mut self.regs;
        match poll_until(timeout, || regs.flag(flag)) {
            PollOutcome::Ready => Ok(()),
            PollOutcome::Timeout => Err(BusError::Timeout(phase)),
        }
    }
}
