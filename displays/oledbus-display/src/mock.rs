//! Recording bus and delay for controller tests

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use oledbus_hal::{I2cBus, CONTROL_COMMAND, CONTROL_DATA};

/// Injected bus failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

/// Bus that records every command and data byte it is handed
pub struct RecordingBus {
    /// Command bytes in order, one per transaction
    pub commands: Vec<u8, 256>,
    /// Data bytes in order
    pub data: Vec<u8, 4096>,
    /// Transactions attempted, including a failed one
    pub transactions: usize,
    /// Fail the transaction with this index
    pub fail_at: Option<usize>,
    /// Address of the most recent transaction
    pub address: Option<u8>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            data: Vec::new(),
            transactions: 0,
            fail_at: None,
            address: None,
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.commands.clear();
        self.data.clear();
        self.transactions = 0;
        self.address = None;
    }
}

impl I2cBus for RecordingBus {
    type Error = Nack;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Nack> {
        let (&control, payload) = data.split_first().ok_or(Nack)?;
        self.write_prefixed(address, control, payload)
    }

    fn write_prefixed(&mut self, address: u8, control: u8, payload: &[u8]) -> Result<(), Nack> {
        let index = self.transactions;
        self.transactions += 1;
        self.address = Some(address);
        if self.fail_at == Some(index) {
            return Err(Nack);
        }

        match control {
            CONTROL_COMMAND => {
                assert_eq!(payload.len(), 1, "commands go out one per transaction");
                self.commands.extend_from_slice(payload).unwrap();
            }
            CONTROL_DATA => self.data.extend_from_slice(payload).unwrap(),
            other => panic!("unexpected control byte {other:#04x}"),
        }
        Ok(())
    }
}

/// Delay that only adds up the time it was asked to wait
#[derive(Default)]
pub struct RecordingDelay {
    pub elapsed_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
