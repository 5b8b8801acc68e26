//! Warmup and threshold policy.
//!
//! Decides what the status LED and the status line show for a reading. The
//! gas sensor needs 20 minutes before its eCO2 estimate is trustworthy, so
//! until then the monitor counts down instead of rating the air.

use crate::clock::{RuntimeClock, Seconds};
use crate::config::PolicyConfig;
use crate::format::{format_hhmmss, format_mmss, TimeText};
use crate::indicator::Color;
use crate::sensors::GasReading;

/// Air quality classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLevel {
    Warmup,
    Good,
    Moderate,
    Poor,
}

impl StatusLevel {
    /// LED color shown for this level
    pub fn color(self) -> Color {
        match self {
            StatusLevel::Warmup => Color::BLUE,
            StatusLevel::Good => Color::GREEN,
            StatusLevel::Moderate => Color::YELLOW,
            StatusLevel::Poor => Color::RED,
        }
    }

    /// Prefix for the status line
    pub fn label(self) -> &'static str {
        match self {
            StatusLevel::Warmup => "Warming: ",
            _ => "Uptime: ",
        }
    }
}

/// Classification plus the text for the time field.
/// Warmup carries the remaining countdown (MM:SS), every other level the uptime (HH:MM:SS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub text: TimeText,
}

/// Result of evaluating one reading against the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub status: Status,
    /// Runtime the status was computed from, after any skip
    pub runtime: Seconds,
    /// Whether this reading moved the clock past the warmup window
    pub warmup_skipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusPolicy {
    config: PolicyConfig,
}

impl StatusPolicy {
    pub fn new(config: PolicyConfig) -> StatusPolicy {
        Self { config }
    }

    /// Classifies a reading. Pure: the same inputs always give the same status.
    /// param runtime: seconds since start
    /// param eco2: eCO2 in ppm
    pub fn classify(&self, runtime: Seconds, eco2: u16) -> Status {
        if runtime < self.config.warmup_secs {
            return Status {
                level: StatusLevel::Warmup,
                text: format_mmss(self.config.warmup_secs - runtime),
            };
        }

        let level = if eco2 <= self.config.good_max_ppm {
            StatusLevel::Good
        } else if eco2 <= self.config.moderate_max_ppm {
            StatusLevel::Moderate
        } else {
            StatusLevel::Poor
        };
        Status {
            level,
            text: format_hhmmss(runtime),
        }
    }

    /// Whether a reading taken at `runtime` shows the sensor was already warm.
    /// A live algorithm result above ambient this early can only come from a
    /// sensor that kept running across a reboot.
    pub fn indicates_warm_sensor(&self, runtime: Seconds, reading: &GasReading) -> bool {
        runtime < self.config.skip_window_secs
            && reading.eco2 > self.config.ambient_eco2_ppm
            && reading.tvoc > 0
    }

    /// Runs the warmup skip check, then classifies on the adjusted runtime.
    /// The skip is a one-shot transition on `clock`, reported in the result.
    pub fn evaluate(&self, clock: &mut RuntimeClock, now: Seconds, reading: &GasReading) -> Assessment {
        let mut warmup_skipped = false;
        if self.indicates_warm_sensor(clock.runtime(now), reading) {
            warmup_skipped = clock.skip_warmup(self.config.warmup_secs);
            if warmup_skipped {
                info!("Warmup skip detected.");
            }
        }

        let runtime = clock.runtime(now);
        Assessment {
            status: self.classify(runtime, reading.eco2),
            runtime,
            warmup_skipped,
        }
    }
}
