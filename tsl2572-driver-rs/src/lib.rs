//! Async driver for the TSL2572 ambient light sensor.
//!
//! This crate provides an `embedded-hal-async` I2C driver for the AMS/TAOS
//! TSL2572 digital ambient light sensor, covering the register map used by
//! the ALS threshold-interrupt subsystem.
//!
//! # Architecture
//!
//! The crate is split into two layers:
//!
//! - **`driver`** (crate-private) — Command-byte construction and the raw
//!   write/read transaction framing, including the fixed-capacity transmit
//!   scratch buffer.
//! - **[`Tsl2572`]** (public) — One typed accessor per register of interest
//!   (enable, thresholds, persistence, gain, integration time, status, both
//!   light channels), plus the clear-interrupt special function.
//!
//! # Quick start
//!
//! ```no_run
//! use embedded_hal_async::i2c::I2c;
//! use tsl2572_driver::{registers::Gain, Error, Tsl2572};
//!
//! // Construct with any `embedded-hal-async` I2C implementation; the
//! // sensor's bus address is fixed and handled internally.
//! async fn bring_up<I2C: I2c>(i2c: I2C) -> Result<u16, Error<I2C::Error>> {
//!     let mut sensor = Tsl2572::new(i2c);
//!     let _id = sensor.device_id().await?;
//!     sensor.set_gain(Gain::X120).await?;
//!     sensor.channel0().await
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on error types
//!   for embedded logging.

#![no_std]

pub use error::Error;
pub use sensor::Tsl2572;

mod driver;
pub mod registers;
mod error;
mod sensor;
