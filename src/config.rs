//! Configuration constants for the monitor.
//!
//! Everything that is fixed at build time lives here: the status policy
//! thresholds, loop timing and the board wiring.

use crate::sensors::Bme280Address;

/// Thresholds and windows used by the status policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PolicyConfig {
    /// Seconds after boot during which readings are considered unreliable.
    pub warmup_secs: i64,
    /// Early window in which a warm sensor is detected.
    pub skip_window_secs: i64,
    /// eCO2 above this (ppm) during the skip window means the sensor was already warm.
    pub ambient_eco2_ppm: u16,
    /// Highest eCO2 (ppm) that is still rated good.
    pub good_max_ppm: u16,
    /// Highest eCO2 (ppm) that is still rated moderate.
    pub moderate_max_ppm: u16,
}

/// Loop and bring-up timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Delay between poll attempts.
    pub poll_interval_ms: u32,
    /// Watchdog timeout. The loop must feed it faster than this.
    pub watchdog_timeout_ms: u32,
    /// Pause after bringing up each peripheral.
    pub settle_ms: u32,
}

/// I2C addresses and bus speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub frequency_hz: u32,
    pub display_address: u8,
    pub atmo_address: Bme280Address,
    pub gas_address: u8,
}

/// Global application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub policy: PolicyConfig,
    pub timing: TimingConfig,
    pub bus: BusConfig,
}

impl Config {
    const fn new() -> Self {
        Self {
            policy: PolicyConfig {
                warmup_secs: 1200, // 20 minutes
                skip_window_secs: 5,
                ambient_eco2_ppm: 400,
                good_max_ppm: 1000,
                moderate_max_ppm: 1400,
            },
            timing: TimingConfig {
                poll_interval_ms: 1000,
                watchdog_timeout_ms: 5000,
                settle_ms: 1000,
            },
            bus: BusConfig {
                frequency_hz: 400_000,
                display_address: 0x3C,
                atmo_address: Bme280Address::Secondary,
                gas_address: 0x5B,
            },
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        CONFIG.policy
    }
}

pub static CONFIG: Config = Config::new();
