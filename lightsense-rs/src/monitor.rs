//! Bring-up state machine, periodic polling and event dispatch.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use defmt_or_log::{info, warn};

use tsl2572_driver::registers::{
    self, Enable, Gain, IntegrationTime, Persist, Status, DEVICE_ID_RESPONSE,
};
use tsl2572_driver::Tsl2572;

use crate::error::MonitorError;
use crate::latch::InterruptLatch;

/// ALS low interrupt threshold programmed at bring-up.
const LOW_THRESHOLD: u16 = 0;

/// ALS high interrupt threshold programmed at bring-up.
const HIGH_THRESHOLD: u16 = 50;

/// APERS filter value: 5 consecutive out-of-threshold cycles before the
/// interrupt latches.
const THRESHOLD_PERSISTENCE: u8 = 0b100;

/// Settle delay after powering the ADC on.
const ENABLE_SETTLE_MS: u32 = 100;

/// Bring-up progress. `Halted` is terminal: the device was not found or a
/// configuration readback failed, and the monitor refuses further work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitState {
    Uninitialized,
    IdentityVerified,
    Configured,
    Armed,
    Halted,
}

/// One poll cycle's channel readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Visible + IR photodiode count.
    pub channel0: u16,
    /// IR-only photodiode count.
    pub channel1: u16,
}

/// Ambient-light monitor: one handle per physical sensor.
///
/// Owns the sensor driver and the session state (last status byte, last
/// channel readings, bring-up progress). The interrupt latch is borrowed so
/// firmware can share it with the interrupt-pin context, and so tests can
/// instantiate several independent simulated devices.
pub struct LightMonitor<'a, I2C> {
    sensor: Tsl2572<I2C>,
    latch: &'a InterruptLatch,
    state: InitState,
    status: Status,
    channel0: u16,
    channel1: u16,
}

impl<'a, I2C> LightMonitor<'a, I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, latch: &'a InterruptLatch) -> Self {
        Self {
            sensor: Tsl2572::new(i2c),
            latch,
            state: InitState::Uninitialized,
            status: Status::new(),
            channel0: 0,
            channel1: 0,
        }
    }

    /// Bring-up progress.
    pub fn state(&self) -> InitState {
        self.state
    }

    /// Channel readings from the most recent poll.
    pub fn last_sample(&self) -> Sample {
        Sample {
            channel0: self.channel0,
            channel1: self.channel1,
        }
    }

    /// Status byte from the most recent poll.
    pub fn last_status(&self) -> Status {
        self.status
    }

    // -----------------------------------------------------------------------
    // Bring-up
    // -----------------------------------------------------------------------

    /// Run the bring-up sequence: identify the device, configure thresholds,
    /// filtering, gain and integration time, then arm the interrupt.
    ///
    /// Identity and configuration-readback failures are terminal; the
    /// monitor enters [`InitState::Halted`] and every later call refuses to
    /// run. Bus errors propagate without halting, so a supervisor may retry
    /// on a transient fault.
    pub async fn initialize<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<(), MonitorError<I2C::Error>> {
        let id = self.sensor.device_id().await?;
        if id != DEVICE_ID_RESPONSE {
            warn!("unexpected device ID: {}", id);
            self.state = InitState::Halted;
            return Err(MonitorError::DeviceNotFound { found: id });
        }
        self.state = InitState::IdentityVerified;

        // Power on the oscillator and ADC and arm the ALS interrupt, then
        // give the device time to settle before the first readback.
        let enable = Enable::new().with_pon(true).with_aen(true).with_aien(true);
        self.sensor.set_enable(enable).await?;
        delay.delay_ms(ENABLE_SETTLE_MS).await;
        let readback = self.sensor.enable().await?;
        if readback.into_bytes() != enable.into_bytes() {
            return self.halt(registers::ENABLE);
        }

        self.sensor.set_low_threshold(LOW_THRESHOLD).await?;
        if self.sensor.low_threshold().await? != LOW_THRESHOLD {
            return self.halt(registers::AILTL);
        }

        self.sensor.set_high_threshold(HIGH_THRESHOLD).await?;
        if self.sensor.high_threshold().await? != HIGH_THRESHOLD {
            return self.halt(registers::AIHTL);
        }

        let persist = Persist::new().with_apers(THRESHOLD_PERSISTENCE);
        self.sensor.set_persistence(persist).await?;
        if self.sensor.persistence().await?.into_bytes() != persist.into_bytes() {
            return self.halt(registers::PERS);
        }

        // Gain and integration time shape the readings, not the comparator;
        // they stay unverified like the rest of the non-comparator setup.
        self.sensor.set_gain(Gain::X120).await?;
        self.sensor
            .set_integration_time(IntegrationTime::Cycles1)
            .await?;
        self.state = InitState::Configured;

        // Drop any interrupt latched while we were configuring.
        self.sensor.clear_interrupt().await?;
        self.state = InitState::Armed;
        info!("light sensor armed");
        Ok(())
    }

    fn halt(&mut self, register: u8) -> Result<(), MonitorError<I2C::Error>> {
        warn!("readback mismatch on register {}", register);
        self.state = InitState::Halted;
        Err(MonitorError::ConfigVerificationFailed { register })
    }

    // -----------------------------------------------------------------------
    // Polling
    // -----------------------------------------------------------------------

    /// Run one poll cycle: read status and both light channels, dispatch a
    /// threshold event if one is pending, and log the readings.
    ///
    /// Intended to be called on a fixed period by an external scheduler.
    pub async fn poll(&mut self) -> Result<Sample, MonitorError<I2C::Error>> {
        if self.state != InitState::Armed {
            return Err(MonitorError::NotArmed);
        }

        self.status = self.sensor.status().await?;
        self.channel0 = self.sensor.channel0().await?;
        self.channel1 = self.sensor.channel1().await?;

        self.dispatch_event().await?;

        info!("als channel0: {}", self.channel0);
        info!("als channel1: {}", self.channel1);

        Ok(self.last_sample())
    }

    /// Edge-triggered event dispatch: the first poll after the latch clears
    /// reports the event and acknowledges the hardware interrupt; repeated
    /// polls do nothing further until a pin edge resets the latch.
    async fn dispatch_event(&mut self) -> Result<(), MonitorError<I2C::Error>> {
        if self.latch.try_latch() {
            info!("als threshold interrupt activated");
            self.sensor.clear_interrupt().await?;
        }
        Ok(())
    }

    /// Release the underlying I2C peripheral.
    pub fn release(self) -> I2C {
        self.sensor.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::vec;
    use std::vec::Vec;

    use embassy_futures::block_on;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0b0111001;

    /// No-op delay for the 100 ms settle step.
    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Bus traffic of a fully successful bring-up sequence.
    fn init_expectations() -> Vec<I2cTransaction> {
        vec![
            // Identity check.
            I2cTransaction::write(ADDR, vec![0xB2]),
            I2cTransaction::read(ADDR, vec![0x34]),
            // Enable {PON, AEN, AIEN} and readback.
            I2cTransaction::write(ADDR, vec![0xA0, 0x13]),
            I2cTransaction::write(ADDR, vec![0xA0]),
            I2cTransaction::read(ADDR, vec![0x13]),
            // Low threshold = 0 and readback.
            I2cTransaction::write(ADDR, vec![0xA4, 0x00, 0x00]),
            I2cTransaction::write(ADDR, vec![0xA4]),
            I2cTransaction::read(ADDR, vec![0x00, 0x00]),
            // High threshold = 50 and readback.
            I2cTransaction::write(ADDR, vec![0xA6, 0x32, 0x00]),
            I2cTransaction::write(ADDR, vec![0xA6]),
            I2cTransaction::read(ADDR, vec![0x32, 0x00]),
            // Persistence = 5 consecutive cycles and readback.
            I2cTransaction::write(ADDR, vec![0xAC, 0x04]),
            I2cTransaction::write(ADDR, vec![0xAC]),
            I2cTransaction::read(ADDR, vec![0x04]),
            // Gain 120x, ATIME = 1 cycle (unverified).
            I2cTransaction::write(ADDR, vec![0xAF, 0x03]),
            I2cTransaction::write(ADDR, vec![0xA1, 0xFF]),
            // Clear any stale interrupt.
            I2cTransaction::write(ADDR, vec![0xE6]),
        ]
    }

    /// Bus traffic of one poll cycle. `clears_interrupt` selects whether
    /// event dispatch acknowledges the hardware interrupt this cycle.
    fn poll_expectations(
        status: u8,
        ch0: [u8; 2],
        ch1: [u8; 2],
        clears_interrupt: bool,
    ) -> Vec<I2cTransaction> {
        let mut expectations = vec![
            I2cTransaction::write(ADDR, vec![0xB3]),
            I2cTransaction::read(ADDR, vec![status]),
            I2cTransaction::write(ADDR, vec![0xB4]),
            I2cTransaction::read(ADDR, ch0.to_vec()),
            I2cTransaction::write(ADDR, vec![0xB6]),
            I2cTransaction::read(ADDR, ch1.to_vec()),
        ];
        if clears_interrupt {
            expectations.push(I2cTransaction::write(ADDR, vec![0xE6]));
        }
        expectations
    }

    #[test]
    fn initialize_reaches_armed() {
        let latch = InterruptLatch::new();
        let i2c = I2cMock::new(&init_expectations());
        let mut monitor = LightMonitor::new(i2c, &latch);

        block_on(monitor.initialize(&mut NoDelay)).unwrap();
        assert_eq!(monitor.state(), InitState::Armed);

        let mut i2c = monitor.release();
        i2c.done();
    }

    #[test]
    fn initialize_halts_on_unknown_device() {
        let latch = InterruptLatch::new();
        let i2c = I2cMock::new(&[
            I2cTransaction::write(ADDR, vec![0xB2]),
            I2cTransaction::read(ADDR, vec![0x51]),
        ]);
        let mut monitor = LightMonitor::new(i2c, &latch);

        let result = block_on(monitor.initialize(&mut NoDelay));
        assert!(matches!(
            result,
            Err(MonitorError::DeviceNotFound { found: 0x51 })
        ));
        assert_eq!(monitor.state(), InitState::Halted);

        // Once halted, polling refuses without touching the bus.
        let result = block_on(monitor.poll());
        assert!(matches!(result, Err(MonitorError::NotArmed)));

        let mut i2c = monitor.release();
        i2c.done();
    }

    #[test]
    fn threshold_readback_mismatch_halts() {
        let latch = InterruptLatch::new();
        let mut expectations = init_expectations();
        // Corrupt the low-threshold readback and drop everything after it.
        expectations.truncate(8);
        expectations[7] = I2cTransaction::read(ADDR, vec![0x01, 0x00]);

        let i2c = I2cMock::new(&expectations);
        let mut monitor = LightMonitor::new(i2c, &latch);

        let result = block_on(monitor.initialize(&mut NoDelay));
        assert!(matches!(
            result,
            Err(MonitorError::ConfigVerificationFailed { register: 0x04 })
        ));
        assert_eq!(monitor.state(), InitState::Halted);

        let mut i2c = monitor.release();
        i2c.done();
    }

    #[test]
    fn poll_before_initialize_refuses() {
        let latch = InterruptLatch::new();
        let i2c = I2cMock::new(&[]);
        let mut monitor = LightMonitor::new(i2c, &latch);

        assert!(matches!(
            block_on(monitor.poll()),
            Err(MonitorError::NotArmed)
        ));

        let mut i2c = monitor.release();
        i2c.done();
    }

    #[test]
    fn poll_updates_session_state() {
        let latch = InterruptLatch::new();
        let mut expectations = init_expectations();
        expectations.extend(poll_expectations(0x11, [0x34, 0x12], [0x02, 0x01], true));

        let i2c = I2cMock::new(&expectations);
        let mut monitor = LightMonitor::new(i2c, &latch);

        block_on(monitor.initialize(&mut NoDelay)).unwrap();
        let sample = block_on(monitor.poll()).unwrap();

        assert_eq!(
            sample,
            Sample {
                channel0: 0x1234,
                channel1: 0x0102
            }
        );
        assert_eq!(monitor.last_sample(), sample);
        assert!(monitor.last_status().avalid());
        assert!(monitor.last_status().aint());

        let mut i2c = monitor.release();
        i2c.done();
    }

    #[test]
    fn repeated_polls_dispatch_only_once() {
        let latch = InterruptLatch::new();
        let mut expectations = init_expectations();
        // First poll dispatches and clears the hardware interrupt; the
        // second must not clear again while the latch stays set.
        expectations.extend(poll_expectations(0x11, [0x40, 0x00], [0x08, 0x00], true));
        expectations.extend(poll_expectations(0x11, [0x41, 0x00], [0x08, 0x00], false));

        let i2c = I2cMock::new(&expectations);
        let mut monitor = LightMonitor::new(i2c, &latch);

        block_on(monitor.initialize(&mut NoDelay)).unwrap();
        block_on(monitor.poll()).unwrap();
        block_on(monitor.poll()).unwrap();
        assert!(latch.is_dispatched());

        let mut i2c = monitor.release();
        i2c.done();
    }

    #[test]
    fn pin_edge_rearms_dispatch() {
        let latch = InterruptLatch::new();
        let mut expectations = init_expectations();
        expectations.extend(poll_expectations(0x11, [0x40, 0x00], [0x08, 0x00], true));
        expectations.extend(poll_expectations(0x11, [0x42, 0x00], [0x09, 0x00], true));

        let i2c = I2cMock::new(&expectations);
        let mut monitor = LightMonitor::new(i2c, &latch);

        block_on(monitor.initialize(&mut NoDelay)).unwrap();
        block_on(monitor.poll()).unwrap();

        // The interrupt pin edge acknowledges the event; the next poll may
        // dispatch again.
        latch.on_pin_edge(true);
        block_on(monitor.poll()).unwrap();

        let mut i2c = monitor.release();
        i2c.done();
    }
}
