//! lightsense-fw
//!
//! TSL2572 ambient-light monitoring firmware for the Raspberry Pi Pico 2.
//! Wires the two library crates into the running system:
//!
//! 1. The poll task brings the sensor up (identify, thresholds, persistence,
//!    gain, integration time, arm) and then polls status + both light
//!    channels on a fixed period.
//! 2. When the measurement leaves the programmed threshold window for long
//!    enough, the sensor latches its interrupt and pulls the INT pin low.
//! 3. The pin task wakes on the edge, records the pin level and resets the
//!    dispatch latch, so the next poll reports the event and acknowledges
//!    the hardware interrupt.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Delay, Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use lightsense::{InterruptLatch, LightMonitor};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Handshake between the INT-pin task and the poll task. This is the only
/// state both contexts touch.
static ALS_LATCH: InterruptLatch = InterruptLatch::new();

/// Poll period for status + channel reads.
const POLL_PERIOD: Duration = Duration::from_millis(500);

/// Concrete I2C type for the sensor; the bus is not shared.
type SensorI2c = I2c<'static, I2C0, i2c::Async>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Bring the sensor up, then poll it forever on a fixed period.
#[embassy_executor::task]
async fn poll_task(mut monitor: LightMonitor<'static, SensorI2c>) {
    if let Err(e) = monitor.initialize(&mut Delay).await {
        // Device absent or misconfigured; nothing sensible to do but stop.
        error!("light sensor bring-up failed: {}", e);
        return;
    }

    let mut ticker = Ticker::every(POLL_PERIOD);
    loop {
        ticker.next().await;
        if let Err(e) = monitor.poll().await {
            // Transient bus faults are survivable; the next tick retries.
            warn!("poll failed: {}", e);
        }
    }
}

/// Forward INT-pin edges to the dispatch latch.
///
/// The INT line is open-drain and active-low; a falling edge means the
/// sensor latched a threshold interrupt, a rising edge follows the
/// acknowledgment. Either way the latch records the level and re-arms
/// event dispatch.
#[embassy_executor::task]
async fn int_pin_task(mut int_pin: Input<'static>) {
    loop {
        int_pin.wait_for_any_edge().await;
        ALS_LATCH.on_pin_edge(int_pin.is_high());
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("lightsense-fw starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA → GP20  (p.PIN_20)
    // I2C_SCL → GP21  (p.PIN_21)
    // ALS_INT → GP19  (p.PIN_19)  open-drain, active-low, pull-up enabled
    // ———————————————————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    let monitor = LightMonitor::new(i2c, &ALS_LATCH);
    let int_pin = Input::new(p.PIN_19, Pull::Up);

    spawner.spawn(poll_task(monitor)).unwrap();
    spawner.spawn(int_pin_task(int_pin)).unwrap();

    info!("all tasks spawned");
}
