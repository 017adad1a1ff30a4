//! Peripheral register access
//!
//! The bus primitives only need a handful of operations on the I2C master
//! peripheral: raise start/stop, load the data register, and sample status
//! flags. Chip-specific crates implement [`I2cRegisters`] on top of their
//! register blocks.

/// Status flags sampled while driving a transaction
///
/// Named after the STM32 I2C v1 status bits. All but [`StatusFlag::Busy`]
/// live in `SR1`; `Busy` is in `SR2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFlag {
    /// Start condition generated (SB)
    StartBit,
    /// Address sent and acknowledged (ADDR)
    AddressSent,
    /// Byte transfer finished (BTF)
    ByteTransferFinished,
    /// Data register empty (TXE)
    TxEmpty,
    /// Bus busy (BUSY)
    Busy,
}

/// I2C master peripheral registers
///
/// Implementations perform raw register accesses with no waiting of their
/// own; all sequencing and bounding lives in [`crate::BusChannel`].
pub trait I2cRegisters {
    /// Request a start condition (CR1.START)
    fn generate_start(&mut self);

    /// Request a stop condition (CR1.STOP)
    fn generate_stop(&mut self);

    /// Load a byte into the data register
    fn write_data(&mut self, byte: u8);

    /// Sample a single status flag
    fn flag(&mut self, flag: StatusFlag) -> bool;

    /// Clear the address flag
    ///
    /// Hardware clears ADDR on a read of SR1 followed by a read of SR2.
    fn clear_address_flag(&mut self);
}

impl<T: I2cRegisters + ?Sized> I2cRegisters for &mut T {
    fn generate_start(&mut self) {
        (**self).generate_start();
    }

    fn generate_stop(&mut self) {
        (**self).generate_stop();
    }

    fn write_data(&mut self, byte: u8) {
        (**self).write_data(byte);
    }

    fn flag(&mut self, flag: StatusFlag) -> bool {
        (**self).flag(flag)
    }

    fn clear_address_flag(&mut self) {
        (**self).clear_address_flag();
    }
}
