#![cfg_attr(not(test), no_std)]

//! # eco2-monitor
//! ## An indoor air quality monitor in Rust
//!
//! Features:
//! - eCO2 / tVOC monitoring (CCS811)
//! - Temperature, humidity and pressure readout (BME280)
//! - 20 minute sensor warmup countdown, skipped when the sensor was already warm
//! - Good / moderate / poor status on an RGB LED
//! - Uptime tracker
//! - Hardware watchdog

#[macro_use]
mod fmt;

pub mod bus;
pub mod ccs811;
pub mod clock;
pub mod config;
pub mod format;
pub mod indicator;
pub mod monitor;
pub mod policy;
pub mod rendering;
pub mod sensors;

#[cfg(test)]
mod testing;
