//! High-level interface for the TSL2572.
//!
//! [`Tsl2572`] wraps the low-level register bus with one typed accessor per
//! register of interest. Each accessor is a fixed-shape call with a
//! hardcoded register address and width; two-byte registers are assembled
//! little-endian from their low/high byte pair.

use embedded_hal_async::i2c::I2c;

use crate::driver::{RegisterBus, TX_BUFFER_CAPACITY};
use crate::error::Error;
use crate::registers::{
    Control, Enable, Gain, IntegrationTime, Persist, Status, AIHTL, AILTL, ATIME, C0DATA, C1DATA,
    CLEAR_ALS_INTERRUPT, CONTROL, ENABLE, ID, PERS, STATUS,
};

/// Widest register write the driver issues (the two-byte threshold pairs).
const WIDEST_REGISTER_WRITE: usize = 2;

// The scratch buffer must fit every write this driver can produce.
const _: () = assert!(WIDEST_REGISTER_WRITE + 1 <= TX_BUFFER_CAPACITY);

/// High-level TSL2572 driver.
///
/// Provides typed, async accessors for the ALS registers over I2C. The
/// sensor's fixed bus address is handled internally.
pub struct Tsl2572<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C> Tsl2572<I2C>
where
    I2C: I2c,
{
    /// Create a new sensor interface.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    pub fn new(i2c: I2C) -> Self {
        Self {
            bus: RegisterBus::new(i2c),
        }
    }

    // -----------------------------------------------------------------------
    // Raw register access
    // -----------------------------------------------------------------------

    /// Read `buf.len()` consecutive registers starting at `reg`.
    pub async fn read_register(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.bus.read(reg, buf).await
    }

    /// Write `data` to consecutive registers starting at `reg`.
    ///
    /// # Errors
    /// * [`Error::BufferTooLarge`] if `data.len() + 1` exceeds the transmit
    ///   buffer capacity; no bus transaction is performed.
    /// * [`Error::I2c`] on communication failure.
    pub async fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        self.bus.write(reg, data).await
    }

    // -----------------------------------------------------------------------
    // Identification and status
    // -----------------------------------------------------------------------

    /// Read the device identification register.
    pub async fn device_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_u8(ID).await
    }

    /// Read the status register.
    pub async fn status(&mut self) -> Result<Status, Error<I2C::Error>> {
        Ok(Status::from_bytes([self.read_u8(STATUS).await?]))
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Read the enable register.
    pub async fn enable(&mut self) -> Result<Enable, Error<I2C::Error>> {
        Ok(Enable::from_bytes([self.read_u8(ENABLE).await?]))
    }

    /// Write the enable register.
    pub async fn set_enable(&mut self, enable: Enable) -> Result<(), Error<I2C::Error>> {
        self.bus.write(ENABLE, &enable.into_bytes()).await
    }

    /// Read the ALS low interrupt threshold.
    pub async fn low_threshold(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_u16(AILTL).await
    }

    /// Write the ALS low interrupt threshold.
    pub async fn set_low_threshold(&mut self, threshold: u16) -> Result<(), Error<I2C::Error>> {
        self.bus.write(AILTL, &threshold.to_le_bytes()).await
    }

    /// Read the ALS high interrupt threshold.
    pub async fn high_threshold(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_u16(AIHTL).await
    }

    /// Write the ALS high interrupt threshold.
    pub async fn set_high_threshold(&mut self, threshold: u16) -> Result<(), Error<I2C::Error>> {
        self.bus.write(AIHTL, &threshold.to_le_bytes()).await
    }

    /// Read the interrupt persistence filter.
    pub async fn persistence(&mut self) -> Result<Persist, Error<I2C::Error>> {
        Ok(Persist::from_bytes([self.read_u8(PERS).await?]))
    }

    /// Write the interrupt persistence filter.
    pub async fn set_persistence(&mut self, persist: Persist) -> Result<(), Error<I2C::Error>> {
        self.bus.write(PERS, &persist.into_bytes()).await
    }

    /// Read the ALS analog gain from the control register.
    pub async fn gain(&mut self) -> Result<Gain, Error<I2C::Error>> {
        Ok(Control::from_bytes([self.read_u8(CONTROL).await?]).again())
    }

    /// Write the ALS analog gain to the control register.
    pub async fn set_gain(&mut self, gain: Gain) -> Result<(), Error<I2C::Error>> {
        let control = Control::new().with_again(gain);
        self.bus.write(CONTROL, &control.into_bytes()).await
    }

    /// Read the raw ATIME cycle count.
    pub async fn integration_time(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_u8(ATIME).await
    }

    /// Write the ALS integration time.
    pub async fn set_integration_time(
        &mut self,
        atime: IntegrationTime,
    ) -> Result<(), Error<I2C::Error>> {
        self.bus.write(ATIME, &[atime.bits()]).await
    }

    // -----------------------------------------------------------------------
    // Light channels
    // -----------------------------------------------------------------------

    /// Read the channel-0 (visible + IR) ADC count.
    pub async fn channel0(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_u16(C0DATA).await
    }

    /// Read the channel-1 (IR only) ADC count.
    pub async fn channel1(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_u16(C1DATA).await
    }

    // -----------------------------------------------------------------------
    // Special functions
    // -----------------------------------------------------------------------

    /// Clear a latched ALS interrupt.
    ///
    /// Until cleared, the sensor keeps asserting its interrupt line even
    /// when the channel values move back inside the threshold window.
    pub async fn clear_interrupt(&mut self) -> Result<(), Error<I2C::Error>> {
        self.bus.special_function(CLEAR_ALS_INTERRUPT).await
    }

    /// Release the underlying I2C peripheral.
    pub fn release(self) -> I2C {
        self.bus.release()
    }

    // -----------------------------------------------------------------------
    // Width helpers
    // -----------------------------------------------------------------------

    async fn read_u8(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.bus.read(reg, &mut buf).await?;
        Ok(buf[0])
    }

    /// Two-byte registers read low byte first; assemble little-endian.
    async fn read_u16(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.bus.read(reg, &mut buf).await?;
        Ok(u16::from_le_bytes(buf))
    }
}
