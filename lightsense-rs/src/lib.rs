//! Ambient-light monitoring on top of the TSL2572 driver.
//!
//! This crate sequences the sensor through bring-up, periodic polling and
//! threshold-interrupt dispatch:
//!
//! 1. [`LightMonitor::initialize`] verifies the device identity, programs
//!    the interrupt thresholds, persistence filter, gain and integration
//!    time (verifying every comparator-visible write by readback), and arms
//!    the interrupt.
//! 2. [`LightMonitor::poll`], driven by an external scheduler, reads the
//!    status register and both light channels and dispatches at most one
//!    event per latched interrupt.
//! 3. [`InterruptLatch::on_pin_edge`], invoked from the platform's
//!    interrupt-pin callback, records the pin level and re-arms dispatch.
//!
//! The latch is the only state shared between the interrupt context and the
//! poll loop; it is a pair of atomics, so no critical section is needed.
//!
//! # Features
//!
//! - **`log`** (default) — route diagnostics through the `log` facade.
//! - **`defmt`** — route diagnostics through `defmt` and derive
//!   [`defmt::Format`] on public types, for embedded targets.

#![no_std]

pub use error::MonitorError;
pub use latch::InterruptLatch;
pub use monitor::{InitState, LightMonitor, Sample};

mod error;
mod latch;
mod monitor;
