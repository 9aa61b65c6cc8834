//! Register map and bit-packed register types for the TSL2572.
//!
//! The sensor exposes an 8-bit register file addressed through a command
//! byte. Register contents are modeled as byte-overlay bitfields: the
//! structured view and the raw byte are always bit-identical, and mutating
//! one field never disturbs reserved bits.

use modular_bitfield::prelude::*;

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Enable register: power, ADC, wait timer and interrupt enables.
pub const ENABLE: u8 = 0x00;

/// ALS integration time (ADC cycle count).
pub const ATIME: u8 = 0x01;

/// Wait time (wait timer cycle count).
pub const WTIME: u8 = 0x03;

/// ALS low interrupt threshold, low byte. High byte at 0x05.
pub const AILTL: u8 = 0x04;

/// ALS high interrupt threshold, low byte. High byte at 0x07.
pub const AIHTL: u8 = 0x06;

/// Interrupt persistence filter.
pub const PERS: u8 = 0x0C;

/// Configuration (wait-long, analog gain scaler).
pub const CONFIG: u8 = 0x0D;

/// Control register (analog gain).
pub const CONTROL: u8 = 0x0F;

/// Device identification register.
pub const ID: u8 = 0x12;

/// Device status.
pub const STATUS: u8 = 0x13;

/// Channel-0 ADC data (visible + IR photodiode), low byte. High byte at 0x15.
pub const C0DATA: u8 = 0x14;

/// Channel-1 ADC data (IR photodiode), low byte. High byte at 0x17.
pub const C1DATA: u8 = 0x16;

// ---------------------------------------------------------------------------
// Fixed values
// ---------------------------------------------------------------------------

/// Value the ID register reads back on a TSL2572.
pub const DEVICE_ID_RESPONSE: u8 = 0x34;

/// Special-function code that clears a latched ALS interrupt.
pub(crate) const CLEAR_ALS_INTERRUPT: u8 = 0b00110;

// ---------------------------------------------------------------------------
// Register contents
// ---------------------------------------------------------------------------

/// ENABLE register contents.
#[bitfield]
#[derive(Debug, Clone, Copy)]
pub struct Enable {
    /// Power on.
    pub pon: bool,
    /// ALS ADC enable.
    pub aen: bool,
    #[skip]
    __: B1,
    /// Wait timer enable.
    pub wen: bool,
    /// ALS interrupt enable.
    pub aien: bool,
    #[skip]
    __: B1,
    /// Sleep after interrupt.
    pub sai: bool,
    #[skip]
    __: B1,
}

/// STATUS register contents.
#[bitfield]
#[derive(Debug, Clone, Copy)]
pub struct Status {
    /// ALS ADC has completed an integration cycle since AEN was set.
    pub avalid: bool,
    #[skip]
    __: B3,
    /// ALS interrupt is pending.
    pub aint: bool,
    #[skip]
    __: B3,
}

/// PERS register contents. `apers` is the number of consecutive
/// out-of-threshold ALS cycles required before the interrupt latches.
#[bitfield]
#[derive(Debug, Clone, Copy)]
pub struct Persist {
    pub apers: B4,
    #[skip]
    __: B4,
}

/// CONFIG register contents.
#[bitfield]
#[derive(Debug, Clone, Copy)]
pub struct Config {
    #[skip]
    __: B1,
    /// Wait-long: scales WTIME by 12x.
    pub wlong: bool,
    /// ALS gain level: scales AGAIN down by 6x.
    pub agl: bool,
    #[skip]
    __: B5,
}

/// CONTROL register contents.
#[bitfield]
#[derive(Debug, Clone, Copy)]
pub struct Control {
    /// ALS analog gain.
    pub again: Gain,
    #[skip]
    __: B6,
}

/// ALS analog gain multiplier.
#[derive(BitfieldSpecifier, Debug, Clone, Copy, PartialEq, Eq)]
#[bits = 2]
pub enum Gain {
    X1 = 0b00,
    X8 = 0b01,
    X16 = 0b10,
    X120 = 0b11,
}

/// Named ATIME cycle counts. The register accepts any 8-bit count; these are
/// the datasheet's reference points (`0xFF` = 1 cycle = 2.73 ms, down to
/// `0x00` = 256 cycles = 699 ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntegrationTime {
    /// 1 cycle, 2.73 ms.
    Cycles1 = 0xFF,
    /// 10 cycles, 27.3 ms.
    Cycles10 = 0xF6,
    /// 37 cycles, 101 ms.
    Cycles37 = 0xDB,
    /// 64 cycles, 175 ms.
    Cycles64 = 0xC0,
    /// 256 cycles, 699 ms.
    Cycles256 = 0x00,
}

impl IntegrationTime {
    /// Raw ATIME register value.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_field_layout_matches_datasheet() {
        let enable = Enable::new().with_pon(true).with_aen(true).with_aien(true);
        assert_eq!(enable.into_bytes(), [0b0001_0011]);
    }

    #[test]
    fn mutating_a_field_preserves_reserved_bits() {
        // All-ones raw byte: clearing PON must leave every other bit alone,
        // including the reserved ones.
        let enable = Enable::from_bytes([0xFF]).with_pon(false);
        assert_eq!(enable.into_bytes(), [0xFE]);

        let persist = Persist::from_bytes([0xF0]).with_apers(0b0100);
        assert_eq!(persist.into_bytes(), [0xF4]);
    }

    #[test]
    fn status_flags_decode() {
        let status = Status::from_bytes([0b0001_0001]);
        assert!(status.avalid());
        assert!(status.aint());

        let status = Status::from_bytes([0b0000_0001]);
        assert!(status.avalid());
        assert!(!status.aint());
    }

    #[test]
    fn control_gain_encodes_two_low_bits() {
        let control = Control::new().with_again(Gain::X120);
        assert_eq!(control.into_bytes(), [0b0000_0011]);
        assert_eq!(Control::from_bytes([0b0000_0010]).again(), Gain::X16);
    }
}
