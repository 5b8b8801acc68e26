//! The once-per-second poll cycle.
//!
//! Ties the peripherals to the status policy: feed the watchdog, wait for a
//! gas reading, read the atmospheric sensor, render, set the LED and hand the
//! ambient conditions back to the gas sensor for compensation.

use core::fmt::{Debug, Write};

use heapless::String;

use crate::clock::{RuntimeClock, Seconds};
use crate::format::format_hhmmss;
use crate::indicator::Indicator;
use crate::policy::{Status, StatusPolicy};
use crate::rendering::{render_readings, TextDisplay};
use crate::sensors::{AtmoReading, AtmoSensor, GasReading, GasSensor};

/// Hardware watchdog that resets the board unless fed in time
pub trait Watchdog {
    fn feed(&mut self);
}

/// Driver error rendered with `Debug`, cut short if it does not fit
pub type Detail = String<48>;

/// Which peripheral failed during a cycle, and how
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorError {
    GasSensor(Detail),
    AtmoSensor(Detail),
    Display(Detail),
    Indicator(Detail),
}

/// Keeps the driver error's text so it survives into the halt log
fn describe<E: Debug>(error: E) -> Detail {
    let mut detail = Detail::new();
    // A full buffer keeps the prefix that fit
    let _ = write!(detail, "{:?}", error);
    detail
}

/// What one poll cycle produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle {
    /// The gas sensor had no new result; try again next interval
    NotReady,
    Measured(Report),
}

/// Everything shown for one measurement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub gas: GasReading,
    pub atmo: AtmoReading,
    pub status: Status,
    pub runtime: Seconds,
    pub warmup_skipped: bool,
}

pub struct Monitor<G, A, D, L, W> {
    gas: G,
    atmo: A,
    display: D,
    led: L,
    watchdog: W,
    policy: StatusPolicy,
    clock: RuntimeClock,
}

impl<G, A, D, L, W> Monitor<G, A, D, L, W>
where
    G: GasSensor,
    A: AtmoSensor,
    D: TextDisplay,
    L: Indicator,
    W: Watchdog,
{
    /// param started: boot time, uptime counts from here
    pub fn new(
        gas: G,
        atmo: A,
        display: D,
        led: L,
        watchdog: W,
        policy: StatusPolicy,
        started: Seconds,
    ) -> Self {
        Self {
            gas,
            atmo,
            display,
            led,
            watchdog,
            policy,
            clock: RuntimeClock::new(started),
        }
    }

    pub fn clock(&self) -> &RuntimeClock {
        &self.clock
    }

    /// Runs one cycle at time `now`
    /// The watchdog is fed first, so a cycle that fails still counts as alive;
    /// the caller decides whether to keep feeding afterwards.
    pub fn poll(&mut self, now: Seconds) -> Result<Cycle, MonitorError> {
        self.watchdog.feed();

        if !self.gas.data_ready().map_err(|e| MonitorError::GasSensor(describe(e)))? {
            debug!("Gas sensor not ready");
            return Ok(Cycle::NotReady);
        }

        let gas = self.gas.read().map_err(|e| MonitorError::GasSensor(describe(e)))?;
        let assessment = self.policy.evaluate(&mut self.clock, now, &gas);

        let raw = self.atmo.read().map_err(|e| MonitorError::AtmoSensor(describe(e)))?;
        let atmo = AtmoReading::from_raw(raw);

        info!("eCO2: {} ppm, TVOC: {} ppb", gas.eco2, gas.tvoc);
        info!("Uptime: {}", format_hhmmss(assessment.runtime).as_str());

        render_readings(&gas, &atmo, &assessment.status, &mut self.display)
            .map_err(|e| MonitorError::Display(describe(e)))?;

        let color = assessment.status.level.color();
        self.led
            .set_color(color)
            .map_err(|e| MonitorError::Indicator(describe(e)))?;
        info!("LED: {}", color.name());

        self.gas
            .calibrate(atmo.humidity_percent(), atmo.temperature_celsius())
            .map_err(|e| MonitorError::GasSensor(describe(e)))?;

        Ok(Cycle::Measured(Report {
            gas,
            atmo,
            status: assessment.status,
            runtime: assessment.runtime,
            warmup_skipped: assessment.warmup_skipped,
        }))
    }

    /// Gives the peripherals back
    pub fn release(self) -> (G, A, D, L, W) {
        (self.gas, self.atmo, self.display, self.led, self.watchdog)
    }
}
