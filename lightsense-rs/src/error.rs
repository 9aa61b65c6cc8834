//! Error types for the monitoring layer.

use core::fmt;

use tsl2572_driver::Error as DriverError;

/// Errors that can occur during bring-up or polling.
#[derive(Debug)]
pub enum MonitorError<E> {
    /// Register access failed (bus error or oversized write).
    Driver(DriverError<E>),

    /// The device identification register did not return the TSL2572
    /// response. Fatal: the monitor halts.
    DeviceNotFound {
        /// Value the ID register actually returned.
        found: u8,
    },

    /// A configuration readback did not match the written value. Fatal:
    /// the monitor halts.
    ConfigVerificationFailed {
        /// Address of the register that failed verification.
        register: u8,
    },

    /// `poll` was called before bring-up completed, or after the monitor
    /// halted.
    NotArmed,
}

// Allow ergonomic `?` propagation from driver errors.
impl<E> From<DriverError<E>> for MonitorError<E> {
    fn from(error: DriverError<E>) -> Self {
        MonitorError::Driver(error)
    }
}

impl<E: fmt::Debug> fmt::Display for MonitorError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MonitorError::Driver(e) => write!(f, "driver error: {}", e),
            MonitorError::DeviceNotFound { found } => {
                write!(f, "device not found (ID register returned {:#04x})", found)
            }
            MonitorError::ConfigVerificationFailed { register } => {
                write!(f, "readback mismatch on register {:#04x}", register)
            }
            MonitorError::NotArmed => write!(f, "monitor is not armed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for MonitorError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MonitorError::Driver(e) => defmt::write!(f, "driver error: {}", e),
            MonitorError::DeviceNotFound { found } => {
                defmt::write!(f, "device not found (ID register returned {=u8:x})", *found)
            }
            MonitorError::ConfigVerificationFailed { register } => {
                defmt::write!(f, "readback mismatch on register {=u8:x}", *register)
            }
            MonitorError::NotArmed => defmt::write!(f, "monitor is not armed"),
        }
    }
}
