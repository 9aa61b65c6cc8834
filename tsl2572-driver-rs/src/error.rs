//! Error types for the TSL2572 driver.

use core::fmt;

/// Errors that can occur when communicating with the sensor.
#[derive(Debug)]
pub enum Error<E> {
    /// Underlying I2C bus error (NACK, timeout, arbitration loss).
    I2c(E),

    /// Requested register write exceeds the fixed transmit buffer capacity.
    /// Recoverable: shrink the request.
    BufferTooLarge,
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::BufferTooLarge => write!(f, "write exceeds transmit buffer capacity"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            Error::BufferTooLarge => defmt::write!(f, "write exceeds transmit buffer capacity"),
        }
    }
}
