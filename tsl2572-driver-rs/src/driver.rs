//! Low-level register access protocol.
//!
//! Implements the TSL2572 command-byte framing: every transaction starts
//! with a command byte selecting the transaction kind and the target
//! register (or special-function code). Register reads are a command-byte
//! write followed by a data read; register writes are a single write of
//! `[command_byte, data...]` staged in a fixed-capacity scratch buffer.
//!
//! This module is crate-private — consumers interact with [`Tsl2572`]
//! in `sensor.rs` instead.
//!
//! [`Tsl2572`]: crate::Tsl2572

use embedded_hal_async::i2c::I2c;

use crate::error::Error;

/// Fixed 7-bit bus address of the TSL2572.
const DEVICE_ADDRESS: u8 = 0b0111001;

/// Transmit scratch buffer capacity: command byte plus data phase. Bounds
/// the worst-case transaction on a memory-constrained target.
pub(crate) const TX_BUFFER_CAPACITY: usize = 10;

/// Transaction kind encoded in bits 6:5 of the command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransactionKind {
    /// Repeatedly access the same register.
    #[allow(dead_code)]
    RepeatedByte = 0b00,
    /// Auto-increment the register address after each data byte.
    AutoIncrement = 0b01,
    /// Execute a special function; the low bits carry the function code.
    SpecialFunction = 0b11,
}

/// Build the command byte for one transaction. Bit 7 is always set.
fn command_byte(kind: TransactionKind, target: u8) -> u8 {
    0x80 | ((kind as u8) << 5) | (target & 0x1F)
}

/// Low-level register bus. Owns the I2C peripheral and frames every
/// transaction with a freshly computed command byte.
pub(crate) struct RegisterBus<I2C> {
    i2c: I2C,
}

impl<I2C> RegisterBus<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Read `buf.len()` consecutive registers starting at `reg`.
    ///
    /// Issues the auto-increment command byte as its own write transaction,
    /// then reads the data phase. Multi-byte registers arrive low byte
    /// first.
    pub async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        let command = command_byte(TransactionKind::AutoIncrement, reg);
        self.i2c.write(DEVICE_ADDRESS, &[command]).await?;
        self.i2c.read(DEVICE_ADDRESS, buf).await?;
        Ok(())
    }

    /// Write `data` to consecutive registers starting at `reg`.
    ///
    /// The command byte and data share one write transaction, staged in a
    /// fixed scratch buffer; requests that do not fit are rejected with
    /// [`Error::BufferTooLarge`] before any bus traffic.
    pub async fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        if data.len() + 1 > TX_BUFFER_CAPACITY {
            return Err(Error::BufferTooLarge);
        }

        let mut frame = [0u8; TX_BUFFER_CAPACITY];
        frame[0] = command_byte(TransactionKind::AutoIncrement, reg);
        frame[1..=data.len()].copy_from_slice(data);

        self.i2c.write(DEVICE_ADDRESS, &frame[..data.len() + 1]).await?;
        Ok(())
    }

    /// Execute a special function: a one-byte write with no data phase.
    pub async fn special_function(&mut self, code: u8) -> Result<(), Error<I2C::Error>> {
        let command = command_byte(TransactionKind::SpecialFunction, code);
        self.i2c.write(DEVICE_ADDRESS, &[command]).await?;
        Ok(())
    }

    /// Release the underlying I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}
